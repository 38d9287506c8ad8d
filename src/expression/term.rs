//! Typed form of a single grid code
//!
//! A code such as `"-2.5_3_(-0.5)"` is tokenized once into a [`Term`]
//! (`coefficient = -2.5`, `function = exp`, `parameter = -0.5`). Grids keep
//! the parsed terms so evaluation never touches strings again.

use std::fmt;
use std::str::FromStr;

use super::{ElementaryFunction, ExpressionError};

/// One `coefficient · g(x, parameter)` contribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub function: ElementaryFunction,
    pub parameter: f64,
}

impl Term {
    pub fn new(coefficient: f64, function: ElementaryFunction, parameter: f64) -> Self {
        Self { coefficient, function, parameter }
    }

    /// Parse a code of the form `[sign]coef_id_[(][sign]param[)]`
    ///
    /// The opening and closing parentheses around the parameter are each optional.
    /// Decimals follow `[0-9]*\.?[0-9]+`, so `.5` is accepted and `5.` is not.
    ///
    /// # Errors
    ///
    /// [`ExpressionError::InvalidEntry`] naming the whole code for any
    /// grammar violation, including function digits outside `1..=7`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ode_rs::expression::{ElementaryFunction, Term};
    ///
    /// let term = Term::parse("+1.5_2_(-0.5)").unwrap();
    /// assert_eq!(term.coefficient, 1.5);
    /// assert_eq!(term.function, ElementaryFunction::Cosine);
    /// assert_eq!(term.parameter, -0.5);
    /// ```
    pub fn parse(code: &str) -> Result<Self, ExpressionError> {
        let invalid = || ExpressionError::InvalidEntry { code: code.to_string() };

        let mut cursor = Cursor::new(code);

        let coefficient = cursor.signed_decimal().ok_or_else(invalid)?;
        cursor.expect(b'_').ok_or_else(invalid)?;

        let digit = cursor.digit().ok_or_else(invalid)?;
        let function = ElementaryFunction::from_id(digit).map_err(|_| invalid())?;
        cursor.expect(b'_').ok_or_else(invalid)?;

        // Each parenthesis is optional on its own
        cursor.accept(b'(');
        let parameter = cursor.signed_decimal().ok_or_else(invalid)?;
        cursor.accept(b')');

        if !cursor.is_done() {
            return Err(invalid());
        }

        Ok(Self { coefficient, function, parameter })
    }

    /// `coefficient · g(x, parameter)`
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficient * self.function.evaluate(x, self.parameter)
    }
}

impl FromStr for Term {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}_{}_({})", self.coefficient, self.function.id(), self.parameter)
    }
}

// =================================================================================================
// Tokenizer
// =================================================================================================

/// Byte cursor over an ASCII code
struct Cursor<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).copied()
    }

    fn is_done(&self) -> bool {
        self.position == self.text.len()
    }

    fn accept(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        self.accept(byte).then_some(())
    }

    fn digit(&mut self) -> Option<u32> {
        let value = (self.peek()? as char).to_digit(10)?;
        self.position += 1;
        Some(value)
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.position;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.position += 1;
        }
        self.position - start
    }

    /// `[+-]?[0-9]*\.?[0-9]+`
    fn signed_decimal(&mut self) -> Option<f64> {
        let start = self.position;

        if !self.accept(b'+') {
            self.accept(b'-');
        }

        let integer_digits = self.skip_digits();
        if self.accept(b'.') {
            if self.skip_digits() == 0 {
                return None;
            }
        } else if integer_digits == 0 {
            return None;
        }

        self.text[start..self.position].parse().ok()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(code: &str) {
        assert_eq!(
            Term::parse(code),
            Err(ExpressionError::InvalidEntry { code: code.to_string() }),
            "`{code}` should be rejected"
        );
    }

    #[test]
    fn test_parse_plain_codes() {
        let term = Term::parse("+1_6_1").unwrap();
        assert_eq!(term, Term::new(1.0, ElementaryFunction::Linear, 1.0));

        let term = Term::parse("-1_7_1").unwrap();
        assert_eq!(term, Term::new(-1.0, ElementaryFunction::Constant, 1.0));

        let term = Term::parse("1_2_1").unwrap();
        assert_eq!(term.function, ElementaryFunction::Cosine);
    }

    #[test]
    fn test_parse_signed_parameter() {
        let term = Term::parse("+1_3_-1").unwrap();
        assert_eq!(term.function, ElementaryFunction::Exponential);
        assert_eq!(term.parameter, -1.0);

        let term = Term::parse("2.5_4_(+0.5)").unwrap();
        assert_eq!(term.coefficient, 2.5);
        assert_eq!(term.parameter, 0.5);
    }

    #[test]
    fn test_parse_leading_dot_decimal() {
        let term = Term::parse(".5_1_.25").unwrap();
        assert_eq!(term.coefficient, 0.5);
        assert_eq!(term.parameter, 0.25);
    }

    #[test]
    fn test_parse_unpaired_parenthesis() {
        let term = Term::parse("1_1_(2").unwrap();
        assert_eq!(term, Term::new(1.0, ElementaryFunction::Sine, 2.0));

        let term = Term::parse("1_1_2)").unwrap();
        assert_eq!(term, Term::new(1.0, ElementaryFunction::Sine, 2.0));

        let term = Term::parse("-3_4_(-0.5").unwrap();
        assert_eq!(term.parameter, -0.5);
    }

    #[test]
    fn test_reject_malformed_codes() {
        assert_invalid("abc");
        assert_invalid("");
        assert_invalid("0");
        assert_invalid("1_8_1");
        assert_invalid("1_0_1");
        assert_invalid("1._1_1");
        assert_invalid("1_1_");
        assert_invalid("1_1_((2)");
        assert_invalid("1_1_2))");
        assert_invalid("1_12_1");
        assert_invalid("1_1_1 ");
        assert_invalid("_1_1");
    }

    #[test]
    fn test_evaluate_term() {
        let term = Term::parse("-2_6_3").unwrap();
        assert_eq!(term.evaluate(0.5), -3.0);
    }

    #[test]
    fn test_display_parses_back() {
        let term = Term::parse("-2.5_3_(-0.5)").unwrap();
        assert_eq!(term.to_string().parse::<Term>().unwrap(), term);
    }
}
