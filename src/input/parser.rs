//! `Key: value` input file parser

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use nalgebra::DMatrix;

use super::InputError;
use crate::solver::NewtonSettings;

// =============================================================================
// Numbers
// =============================================================================

/// Parse a decimal number or a fraction `p/q`
///
/// # Errors
///
/// - [`InputError::InvalidNumber`] when either side is not a number
/// - [`InputError::ZeroDenominator`] for `p/0`
///
/// # Example
///
/// ```rust
/// use ode_rs::input::parse_fraction;
///
/// assert_eq!(parse_fraction("3/4").unwrap(), 0.75);
/// assert_eq!(parse_fraction("-0.5").unwrap(), -0.5);
/// assert!(parse_fraction("1/0").is_err());
/// ```
pub fn parse_fraction(text: &str) -> Result<f64, InputError> {
    let number = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|_| InputError::InvalidNumber(text.to_string()))
    };

    match text.split_once('/') {
        None => number(text),
        Some((numerator, denominator)) => {
            let numerator = number(numerator)?;
            let denominator = number(denominator)?;
            if denominator == 0.0 {
                return Err(InputError::ZeroDenominator(text.to_string()));
            }
            Ok(numerator / denominator)
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Raw lines grouped by key
struct Sections {
    entries: HashMap<String, Vec<String>>,
}

impl Sections {
    fn parse(text: &str) -> Result<Self, InputError> {
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();
        let mut current: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let Some((key, rest)) = line.split_once(':') else {
                    return Err(InputError::Format {
                        line: index + 1,
                        message: format!("missing colon in `{line}`"),
                    });
                };
                let key = key.trim().to_string();
                entries.entry(key.clone()).or_default().push(rest.trim().to_string());
                current = Some(key);
            } else if let Some(key) = &current {
                entries.entry(key.clone()).or_default().push(line.to_string());
            } else {
                return Err(InputError::Format {
                    line: index + 1,
                    message: format!("value without a key: `{line}`"),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Non-empty lines of a key, `None` when missing or marked `NA`
    fn lines(&self, key: &str) -> Option<Vec<&str>> {
        let lines: Vec<&str> = self
            .entries
            .get(key)?
            .iter()
            .map(String::as_str)
            .filter(|line| !line.is_empty())
            .collect();

        match lines.first() {
            None => None,
            Some(first) if first.split_whitespace().next() == Some("NA") => None,
            Some(_) => Some(lines),
        }
    }

    fn tokens(&self, key: &str) -> Option<Vec<&str>> {
        self.lines(key)
            .map(|lines| lines.into_iter().flat_map(str::split_whitespace).collect())
    }

    /// Single value parsed with `FromStr`
    fn value<T: FromStr>(&self, key: &str) -> Result<Option<T>, InputError> {
        let Some(tokens) = self.tokens(key) else {
            return Ok(None);
        };
        match tokens.as_slice() {
            [single] => single.parse().map(Some).map_err(|_| InputError::InvalidValue {
                key: key.to_string(),
                message: format!("cannot parse `{single}`"),
            }),
            _ => Err(InputError::InvalidValue {
                key: key.to_string(),
                message: format!("expected a single value, got {}", tokens.len()),
            }),
        }
    }

    fn required_value<T: FromStr>(&self, key: &str) -> Result<T, InputError> {
        self.value(key)?.ok_or_else(|| InputError::MissingKey(key.to_string()))
    }

    /// Single number, fractions allowed
    fn number(&self, key: &str) -> Result<f64, InputError> {
        let tokens = self
            .tokens(key)
            .ok_or_else(|| InputError::MissingKey(key.to_string()))?;
        match tokens.as_slice() {
            [single] => parse_fraction(single),
            _ => Err(InputError::InvalidValue {
                key: key.to_string(),
                message: format!("expected a single number, got {} values", tokens.len()),
            }),
        }
    }

    /// All numbers of a key, fractions allowed
    fn numbers(&self, key: &str) -> Result<Option<Vec<f64>>, InputError> {
        self.tokens(key)
            .map(|tokens| tokens.into_iter().map(parse_fraction).collect::<Result<Vec<_>, _>>())
            .transpose()
    }

    /// One row of whitespace-separated codes per line
    fn grid(&self, key: &str) -> Option<Vec<Vec<String>>> {
        self.lines(key).map(|lines| {
            lines
                .iter()
                .map(|line| line.split_whitespace().map(str::to_string).collect())
                .collect()
        })
    }
}

// =============================================================================
// Input parameters
// =============================================================================

/// Everything read from an input file
#[derive(Debug, Clone, PartialEq)]
pub struct InputParameters {
    pub num_equations: usize,
    pub function_matrix: Vec<Vec<String>>,
    pub derivative_matrix: Option<Vec<Vec<String>>>,
    pub method: i64,
    pub initial_time: f64,
    pub final_time: f64,
    pub step_size: f64,
    pub num_steps: usize,
    pub initial_condition: DMatrix<f64>,
    pub num_stages: Option<usize>,
    pub a: Option<DMatrix<f64>>,
    pub b: Option<Vec<f64>>,
    pub c: Option<Vec<f64>>,
    pub alpha: Option<Vec<f64>>,
    pub beta: Option<Vec<f64>>,
    pub newton: NewtonSettings,
}

impl InputParameters {
    /// Read and parse an input file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!("parsing input file {}", path.display());
        Self::parse(&text)
    }

    /// Parse the content of an input file
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let sections = Sections::parse(text)?;

        // ====== Problem ======

        let num_equations: usize = sections.required_value("Number of equations")?;
        if num_equations == 0 {
            return Err(InputError::InvalidValue {
                key: "Number of equations".to_string(),
                message: "must be positive".to_string(),
            });
        }

        let function_matrix = sections
            .grid("Function combination")
            .ok_or_else(|| InputError::MissingKey("Function combination".to_string()))?;
        let derivative_matrix = sections.grid("Derivative combination");

        let method = sections.required_value("Method")?;

        // ====== Time grid ======

        let initial_time = sections.number("Initial Time")?;
        let final_time = sections.number("Final Time")?;
        let step_size = sections.number("Step Size")?;

        // ====== Initial condition ======

        let num_steps = sections.value("Number of Steps")?.unwrap_or(1);
        let values = sections
            .numbers("Initial Condition")?
            .ok_or_else(|| InputError::MissingKey("Initial Condition".to_string()))?;
        // A single column is accepted whatever the step count, the rest is bootstrapped
        let columns = if values.len() == num_equations * num_steps {
            num_steps
        } else if values.len() == num_equations {
            1
        } else {
            return Err(InputError::InvalidValue {
                key: "Initial Condition".to_string(),
                message: format!(
                    "expected {num_equations} x {num_steps} = {} values, got {}",
                    num_equations * num_steps,
                    values.len()
                ),
            });
        };
        let initial_condition = DMatrix::from_column_slice(num_equations, columns, &values);

        // ====== Runge-Kutta tableau ======

        let num_stages: Option<usize> = sections.value("Number of Stages")?;
        let a = match sections.numbers("A")? {
            None => None,
            Some(values) => {
                let stages = num_stages
                    .ok_or_else(|| InputError::MissingKey("Number of Stages".to_string()))?;
                if values.len() != stages * stages {
                    return Err(InputError::InvalidValue {
                        key: "A".to_string(),
                        message: format!("expected {} values, got {}", stages * stages, values.len()),
                    });
                }
                Some(DMatrix::from_row_slice(stages, stages, &values))
            }
        };
        let b = sections.numbers("B")?;
        let c = sections.numbers("C")?;

        // ====== Multistep coefficients ======

        let alpha = sections.numbers("Alpha")?;
        let beta = sections.numbers("Beta")?;

        // ====== Newton ======

        let defaults = NewtonSettings::default();
        let newton = NewtonSettings::new(
            match sections.tokens("Newton Tolerance") {
                Some(_) => sections.number("Newton Tolerance")?,
                None => defaults.tolerance,
            },
            sections.value("Newton Iterations")?.unwrap_or(defaults.max_iterations),
        );

        Ok(Self {
            num_equations,
            function_matrix,
            derivative_matrix,
            method,
            initial_time,
            final_time,
            step_size,
            num_steps,
            initial_condition,
            num_stages,
            a,
            b,
            c,
            alpha,
            beta,
            newton,
        })
    }
}

impl FromStr for InputParameters {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VECTOR_INPUT: &str = "\
Number of equations: 2
Function combination: +1_6_1 0 +1_6_1
                      +1_1_1 -1_6_1 0
Derivative combination: 0 +1_7_1
                        -1_7_1 0
Method: 3
Initial Time: 0
Final Time: 1
Step Size: 1/10
Number of Steps: 2
Initial Condition: 1 0
                   1 -0.1
Beta: 3/2 -1/2
";

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("1/4").unwrap(), 0.25);
        assert_eq!(parse_fraction(" 2 ").unwrap(), 2.0);
        assert!(matches!(parse_fraction("1/0"), Err(InputError::ZeroDenominator(_))));
        assert!(matches!(parse_fraction("x/2"), Err(InputError::InvalidNumber(_))));
    }

    #[test]
    fn test_parse_vector_input() {
        let params = InputParameters::parse(VECTOR_INPUT).unwrap();

        assert_eq!(params.num_equations, 2);
        assert_eq!(params.function_matrix[0], vec!["+1_6_1", "0", "+1_6_1"]);
        assert_eq!(params.function_matrix[1], vec!["+1_1_1", "-1_6_1", "0"]);
        assert_eq!(params.derivative_matrix.as_ref().unwrap().len(), 2);
        assert_eq!(params.method, 3);
        assert_eq!(params.step_size, 0.1);
        assert_eq!(params.num_steps, 2);
        assert_eq!(params.beta, Some(vec![1.5, -0.5]));
        assert!(params.alpha.is_none());
        assert_eq!(params.newton, NewtonSettings::default());
    }

    #[test]
    fn test_initial_condition_is_column_major() {
        let params = InputParameters::parse(VECTOR_INPUT).unwrap();

        assert_eq!(params.initial_condition.column(0).as_slice(), &[1.0, 0.0]);
        assert_eq!(params.initial_condition.column(1).as_slice(), &[1.0, -0.1]);
    }

    #[test]
    fn test_runge_kutta_matrix_is_row_major() {
        let text = "\
Number of equations: 1
Function combination: 0 -1_6_1
Method: 1
Initial Time: 0
Final Time: 1
Step Size: 0.1
Initial Condition: 1
Number of Stages: 2
A: 0 0
   1/2 0
B: 0 1
C: 0 1/2
";
        let params = InputParameters::parse(text).unwrap();
        let a = params.a.unwrap();

        assert_eq!(a[(1, 0)], 0.5);
        assert_eq!(a[(0, 1)], 0.0);
        assert_eq!(params.c, Some(vec![0.0, 0.5]));
    }

    #[test]
    fn test_derivative_na_and_newton_keys() {
        let text = "\
Number of equations: 1
Function combination: 0 -1_6_1
Derivative combination: NA
Method: 5
Initial Time: 0
Final Time: 1
Step Size: 0.1
Initial Condition: 1
Newton Tolerance: 1e-8
Newton Iterations: 20
";
        let params = InputParameters::parse(text).unwrap();

        assert!(params.derivative_matrix.is_none());
        assert_eq!(params.newton, NewtonSettings::new(1e-8, 20));
    }

    #[test]
    fn test_missing_key() {
        let text = "Number of equations: 1\nMethod: 2\n";
        assert!(matches!(
            InputParameters::parse(text),
            Err(InputError::MissingKey(key)) if key == "Function combination"
        ));
    }

    #[test]
    fn test_format_errors() {
        assert!(matches!(
            InputParameters::parse("Number of equations 2\n"),
            Err(InputError::Format { line: 1, .. })
        ));
        assert!(matches!(
            InputParameters::parse("\n  1 2 3\n"),
            Err(InputError::Format { line: 2, .. })
        ));
    }

    #[test]
    fn test_initial_condition_size_checked() {
        let text = VECTOR_INPUT.replace("Number of Steps: 2", "Number of Steps: 3");
        assert!(matches!(
            InputParameters::parse(&text),
            Err(InputError::InvalidValue { key, .. }) if key == "Initial Condition"
        ));

        let single = VECTOR_INPUT.replace("                   1 -0.1\n", "");
        assert_eq!(InputParameters::parse(&single).unwrap().initial_condition.ncols(), 1);

        let text = VECTOR_INPUT.replace("1 -0.1", "1 -0.1 2");
        assert!(matches!(
            InputParameters::parse(&text),
            Err(InputError::InvalidValue { key, .. }) if key == "Initial Condition"
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(VECTOR_INPUT.as_bytes()).unwrap();

        let params = InputParameters::from_file(file.path()).unwrap();
        assert_eq!(params.num_equations, 2);

        assert!(matches!(
            InputParameters::from_file("/nonexistent/input.txt"),
            Err(InputError::Io { .. })
        ));
    }
}
