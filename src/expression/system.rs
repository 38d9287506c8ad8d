//! String-grid evaluator for the right-hand side and its Jacobian

use nalgebra::{DMatrix, DVector};

use super::{numerical_jacobian, ExpressionError, ExpressionGrid, OdeSystem};

/// System described by a function grid and an optional derivative grid
///
/// # Layout
///
/// - `functions`: `n` rows, `n + 1` columns. Column 0 uses `t`,
///   column `j ≥ 1` uses `y[j-1]`. Terms of a row are summed.
/// - `derivatives`: `n × n`. Entry `(i, j)` is `∂f_i/∂y_j`, evaluated at
///   `y[j]`. When absent the Jacobian is approximated numerically.
///
/// # Evaluation
///
/// Evaluation is read-only and re-entrant: codes were parsed once into
/// typed cells, and each call allocates its own output.
#[derive(Debug, Clone)]
pub struct ExpressionSystem {
    functions: ExpressionGrid,
    derivatives: Option<ExpressionGrid>,
    name: String,
}

impl ExpressionSystem {
    /// Build an evaluator from parsed grids
    ///
    /// # Errors
    ///
    /// [`ExpressionError::InvalidArgument`] when:
    /// - the derivative grid is not square (an empty grid is not square)
    /// - the function grid does not have `n` rows and `n + 1` columns
    pub fn new(
        functions: ExpressionGrid,
        derivatives: Option<ExpressionGrid>,
    ) -> Result<Self, ExpressionError> {
        if let Some(grid) = &derivatives
            && !grid.is_square()
        {
            return Err(ExpressionError::InvalidArgument(format!(
                "derivative combination must be square, got {} x {}",
                grid.rows(),
                grid.cols()
            )));
        }

        let n = functions.rows();
        if n == 0 {
            return Err(ExpressionError::InvalidArgument(
                "function combination must have at least one row".to_string(),
            ));
        }
        if functions.cols() != n + 1 {
            return Err(ExpressionError::InvalidArgument(format!(
                "function combination must be {n} x {}, got {n} x {}",
                n + 1,
                functions.cols()
            )));
        }
        if let Some(grid) = &derivatives
            && grid.rows() != n
        {
            return Err(ExpressionError::InvalidArgument(format!(
                "derivative combination is {} x {0} but there are {n} equations",
                grid.rows()
            )));
        }

        Ok(Self {
            functions,
            derivatives,
            name: "Expression System".to_string(),
        })
    }

    /// Build an evaluator directly from string slices
    ///
    /// # Example
    ///
    /// ```rust
    /// use ode_rs::expression::{ExpressionSystem, OdeSystem};
    ///
    /// // y' = e^{-t} + cos(y), Jacobian -sin(y)
    /// let system = ExpressionSystem::from_strs(&[&["+1_3_-1", "1_2_1"]], Some(&[&["-1_1_1"]]))
    ///     .unwrap();
    /// assert_eq!(system.dimension(), 1);
    /// ```
    pub fn from_strs(
        functions: &[&[&str]],
        derivatives: Option<&[&[&str]]>,
    ) -> Result<Self, ExpressionError> {
        let functions = ExpressionGrid::from_strs(functions)?;
        let derivatives = derivatives.map(ExpressionGrid::from_strs).transpose()?;
        Self::new(functions, derivatives)
    }

    /// Replace the name reported in logs and metadata
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn functions(&self) -> &ExpressionGrid {
        &self.functions
    }

    pub fn derivatives(&self) -> Option<&ExpressionGrid> {
        self.derivatives.as_ref()
    }

    /// Whether the Jacobian comes from a derivative grid
    pub fn has_analytic_jacobian(&self) -> bool {
        self.derivatives.is_some()
    }

    /// Check every cell of both grids up front
    pub fn validate(&self) -> Result<(), ExpressionError> {
        self.functions.validate()?;
        if let Some(grid) = &self.derivatives {
            grid.validate()?;
        }
        Ok(())
    }

    fn check_state(&self, y: &DVector<f64>) -> Result<(), ExpressionError> {
        if y.len() != self.functions.rows() {
            return Err(ExpressionError::InvalidArgument(format!(
                "state has {} components, system has {} equations",
                y.len(),
                self.functions.rows()
            )));
        }
        Ok(())
    }
}

impl OdeSystem for ExpressionSystem {
    fn dimension(&self) -> usize {
        self.functions.rows()
    }

    fn right_hand_side(&self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, ExpressionError> {
        self.check_state(y)?;

        let n = self.dimension();
        let mut result = DVector::zeros(n);

        for i in 0..n {
            for (j, cell) in self.functions.row(i).iter().enumerate() {
                if let Some(term) = cell.term()? {
                    let x = if j == 0 { t } else { y[j - 1] };
                    result[i] += term.evaluate(x);
                }
            }
        }

        Ok(result)
    }

    fn jacobian(&self, t: f64, y: &DVector<f64>) -> Result<DMatrix<f64>, ExpressionError> {
        self.check_state(y)?;

        let Some(grid) = &self.derivatives else {
            return numerical_jacobian(self, t, y);
        };

        let n = self.dimension();
        let mut jacobian = DMatrix::zeros(n, n);

        for i in 0..n {
            for (j, cell) in grid.row(i).iter().enumerate() {
                if let Some(term) = cell.term()? {
                    jacobian[(i, j)] = term.evaluate(y[j]);
                }
            }
        }

        Ok(jacobian)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vector_system() -> ExpressionSystem {
        ExpressionSystem::from_strs(
            &[&["+1_6_1", "0", "+1_6_1"], &["+1_1_1", "-1_6_1", "0"]],
            Some(&[&["0", "+1_7_1"], &["-1_7_1", "0"]]),
        )
        .unwrap()
    }

    #[test]
    fn test_right_hand_side_vector_system() {
        let system = vector_system();
        let y = DVector::from_vec(vec![2.0, 3.0]);

        let f = system.right_hand_side(0.5, &y).unwrap();

        // f1 = t + y2, f2 = sin(t) - y1
        assert_relative_eq!(f[0], 3.5);
        assert_relative_eq!(f[1], 0.5f64.sin() - 2.0);
    }

    #[test]
    fn test_analytic_jacobian() {
        let system = vector_system();
        let y = DVector::from_vec(vec![2.0, 3.0]);

        let jacobian = system.jacobian(0.0, &y).unwrap();

        assert_eq!(jacobian, DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0, 0.0]));
    }

    #[test]
    fn test_jacobian_entry_uses_matching_component() {
        // ∂f1/∂y2 = 2·y2 written as 2·y^1, evaluated at y[1]
        let system = ExpressionSystem::from_strs(
            &[&["0", "0", "1_4_2"], &["0", "0", "0"]],
            Some(&[&["0", "2_4_1"], &["0", "0"]]),
        )
        .unwrap();
        let y = DVector::from_vec(vec![10.0, 3.0]);

        let jacobian = system.jacobian(0.0, &y).unwrap();

        assert_relative_eq!(jacobian[(0, 1)], 6.0);
        assert_relative_eq!(jacobian[(0, 0)], 0.0);
    }

    #[test]
    fn test_numerical_jacobian_fallback() {
        let system = ExpressionSystem::from_strs(&[&["+1_3_-1", "1_2_1"]], None).unwrap();
        assert!(!system.has_analytic_jacobian());

        let y = DVector::from_vec(vec![0.3]);
        let jacobian = system.jacobian(0.0, &y).unwrap();

        assert_relative_eq!(jacobian[(0, 0)], -(0.3f64).sin(), epsilon = 1e-8);
    }

    #[test]
    fn test_non_square_derivatives_rejected() {
        let result = ExpressionSystem::from_strs(
            &[&["0", "0", "0"], &["0", "0", "0"]],
            Some(&[&["0", "0"]]),
        );
        assert!(matches!(result, Err(ExpressionError::InvalidArgument(msg)) if msg.contains("square")));
    }

    #[test]
    fn test_empty_derivatives_rejected() {
        let result = ExpressionSystem::from_strs(&[&["0", "0"]], Some(&[]));
        assert!(matches!(result, Err(ExpressionError::InvalidArgument(_))));
    }

    #[test]
    fn test_function_grid_shape_checked() {
        let result = ExpressionSystem::from_strs(&[&["0", "0"], &["0", "0"]], None);
        assert!(matches!(result, Err(ExpressionError::InvalidArgument(_))));
    }

    #[test]
    fn test_malformed_entry_fails_on_evaluation() {
        let system = ExpressionSystem::from_strs(&[&["abc", "0"]], None).unwrap();
        let y = DVector::from_vec(vec![1.0]);

        assert_eq!(
            system.right_hand_side(0.0, &y),
            Err(ExpressionError::InvalidEntry { code: "abc".to_string() })
        );
        assert!(system.validate().is_err());
    }

    #[test]
    fn test_state_size_checked() {
        let system = vector_system();
        let y = DVector::from_vec(vec![1.0]);
        assert!(matches!(
            system.right_hand_side(0.0, &y),
            Err(ExpressionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let system = vector_system();
        let y = DVector::from_vec(vec![0.25, -0.75]);
        let first = system.right_hand_side(0.3, &y).unwrap();
        let second = system.right_hand_side(0.3, &y).unwrap();
        assert_eq!(first, second);
    }
}
