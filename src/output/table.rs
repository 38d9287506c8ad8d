//! Plain-text rendering of approximation tables
//!
//! ```text
//! Approximations (2x3):
//! [ 1, 1, 1.01 ]
//! [ 0, -0.1, -0.19 ]
//! ```
//!
//! Values use the shortest `%g` style form with 4 significant digits.

use std::fmt;

use nalgebra::DMatrix;

use crate::solver::SimulationResult;

/// Significant digits used when none is given
pub const DEFAULT_PRECISION: usize = 4;

/// Format `value` like C's `%.{precision}g`
///
/// # Example
///
/// ```rust
/// use ode_rs::output::format_general;
///
/// assert_eq!(format_general(1.112799, 4), "1.113");
/// assert_eq!(format_general(0.00001234, 4), "1.234e-05");
/// assert_eq!(format_general(2.0, 4), "2");
/// ```
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Named matrix printed one row per line
#[derive(Clone, Copy, Debug)]
pub struct MatrixTable<'a> {
    name: &'a str,
    matrix: &'a DMatrix<f64>,
    precision: usize,
}

impl<'a> MatrixTable<'a> {
    pub fn new(name: &'a str, matrix: &'a DMatrix<f64>) -> Self {
        Self { name, matrix, precision: DEFAULT_PRECISION }
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl fmt::Display for MatrixTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}x{}):", self.name, self.matrix.nrows(), self.matrix.ncols())?;
        for row in self.matrix.row_iter() {
            let cells: Vec<String> =
                row.iter().map(|&v| format_general(v, self.precision)).collect();
            writeln!(f, "[ {} ]", cells.join(", "))?;
        }
        Ok(())
    }
}

impl SimulationResult {
    /// Printable view of the approximation table
    ///
    /// # Example
    ///
    /// ```rust
    /// use ode_rs::solver::SimulationResult;
    /// use nalgebra::DMatrix;
    ///
    /// let result = SimulationResult::new(
    ///     vec![0.0, 0.1],
    ///     DMatrix::from_row_slice(1, 2, &[0.0, 0.2]),
    /// );
    /// assert_eq!(result.table("y").to_string(), "y (1x2):\n[ 0, 0.2 ]\n");
    /// ```
    pub fn table<'a>(&'a self, name: &'a str) -> MatrixTable<'a> {
        MatrixTable::new(name, &self.approximations)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_general_fixed() {
        assert_eq!(format_general(1.112799, 4), "1.113");
        assert_eq!(format_general(-0.603061, 4), "-0.6031");
        assert_eq!(format_general(0.1, 4), "0.1");
        assert_eq!(format_general(100.0, 4), "100");
        assert_eq!(format_general(0.0001, 4), "0.0001");
    }

    #[test]
    fn test_format_general_scientific() {
        assert_eq!(format_general(123456.0, 4), "1.235e+05");
        assert_eq!(format_general(0.00001, 4), "1e-05");
        assert_eq!(format_general(-2.5e-7, 4), "-2.5e-07");
    }

    #[test]
    fn test_format_general_special_values() {
        assert_eq!(format_general(0.0, 4), "0");
        assert_eq!(format_general(f64::NAN, 4), "nan");
        assert_eq!(format_general(f64::NEG_INFINITY, 4), "-inf");
    }

    #[test]
    fn test_matrix_layout() {
        let matrix = DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 1.01, 0.0, -0.1, -0.19]);
        let text = MatrixTable::new("Approximations", &matrix).to_string();

        assert_eq!(text, "Approximations (2x3):\n[ 1, 1, 1.01 ]\n[ 0, -0.1, -0.19 ]\n");
    }

    #[test]
    fn test_custom_precision() {
        let matrix = DMatrix::from_element(1, 1, std::f64::consts::PI);
        let text = MatrixTable::new("pi", &matrix).precision(8).to_string();

        assert_eq!(text, "pi (1x1):\n[ 3.1415927 ]\n");
    }
}
