use crate::symbolic::symbolic_engine::{CONST_TOLERANCE, Expr, FactorSign};

impl Expr {
    // EVALUATION - numeric value of the expression at a given x

    /// Evaluates the expression at `x`.
    ///
    /// Returns `None` wherever the function is undefined instead of producing NaN:
    /// - any sub-evaluation is `None` (one absent child poisons the whole tree)
    /// - a divisor with |v| < 1e-10
    /// - a Product or Pow whose value is NaN or infinite
    /// - ln of a non-positive argument, any function of a non-finite argument
    /// - the `Invalid` sentinel
    ///
    /// # Examples
    /// ```
    /// use RustedGraphDots::symbolic::symbolic_engine::Expr;
    /// let f = Expr::Const(1.0) / Expr::Var;
    /// assert_eq!(f.evaluate(2.0), Some(0.5));
    /// assert_eq!(f.evaluate(0.0), None);
    /// ```
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        match self {
            Expr::Invalid => None,
            Expr::Var => Some(x),
            Expr::Const(val) => Some(*val),
            Expr::Sum(terms) => {
                let mut acc = 0.0;
                for (sign, term) in terms {
                    acc += sign.factor() * term.evaluate(x)?;
                }
                Some(acc)
            }
            Expr::Product(factors) => {
                let mut acc = 1.0;
                for (sign, factor) in factors {
                    let value = factor.evaluate(x)?;
                    match sign {
                        FactorSign::Multiply => acc *= value,
                        FactorSign::Divide => {
                            if value.abs() < CONST_TOLERANCE {
                                return None;
                            }
                            acc /= value;
                        }
                    }
                    if !acc.is_finite() {
                        return None;
                    }
                }
                Some(acc)
            }
            Expr::Pow(base, exp) => {
                let value = base.evaluate(x)?.powf(exp.evaluate(x)?);
                if value.is_finite() { Some(value) } else { None }
            }
            Expr::Func(kind, arg) => {
                let value = arg.evaluate(x)?;
                if kind.accepts(value) {
                    Some(kind.apply(value))
                } else {
                    None
                }
            }
        }
    }

    /// Converts the expression into a reusable closure `x -> Option<f64>`.
    ///
    /// The closure borrows the expression, so it can be handed to the curve tracer and
    /// the hit tester without cloning the tree.
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> Option<f64> + Send + Sync + '_> {
        Box::new(move |x| self.evaluate(x))
    }

    /// evaluate on a set of points, undefined points stay `None`
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<Option<f64>> {
        let f = self.lambdify1D();
        xs.iter().map(|&x| f(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::{FunctionKind, Sign};
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluate_leaves() {
        assert_eq!(Expr::Var.evaluate(3.5), Some(3.5));
        assert_eq!(Expr::Const(-2.0).evaluate(100.0), Some(-2.0));
        assert_eq!(Expr::Invalid.evaluate(0.0), None);
    }

    #[test]
    fn test_evaluate_sum_with_signs() {
        let expr = Expr::Sum(vec![
            (Sign::Minus, Expr::Var),
            (Sign::Plus, Expr::Const(4.0)),
            (Sign::Minus, Expr::Const(1.0)),
        ]);
        assert_relative_eq!(expr.evaluate(2.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_evaluate_product_division_by_near_zero() {
        let expr = Expr::Const(1.0) / Expr::Var;
        assert_eq!(expr.evaluate(0.0), None);
        assert_eq!(expr.evaluate(1e-11), None);
        assert_relative_eq!(expr.evaluate(1e-9).unwrap(), 1e9, epsilon = 1.0);
    }

    #[test]
    fn test_evaluate_product_overflow() {
        let expr = Expr::Const(1e300) * Expr::Const(1e300);
        assert_eq!(expr.evaluate(0.0), None);
    }

    #[test]
    fn test_evaluate_pow() {
        let expr = Expr::Var.pow(Expr::Const(2.0));
        assert_relative_eq!(expr.evaluate(3.0).unwrap(), 9.0);
        // negative base, fractional exponent is NaN
        let root = Expr::Var.pow(Expr::Const(0.5));
        assert_eq!(root.evaluate(-4.0), None);
        assert_relative_eq!(root.evaluate(4.0).unwrap(), 2.0);
        // 0^-1 is infinite
        let inv = Expr::Var.pow(Expr::Const(-1.0));
        assert_eq!(inv.evaluate(0.0), None);
    }

    #[test]
    fn test_evaluate_functions() {
        assert_eq!(Expr::Var.ln().evaluate(0.0), None);
        assert_eq!(Expr::Var.ln().evaluate(-1.0), None);
        assert_relative_eq!(Expr::Var.ln().evaluate(1.0).unwrap(), 0.0);
        assert_relative_eq!(Expr::Var.abs().evaluate(-3.0).unwrap(), 3.0);
        assert_relative_eq!(Expr::Var.sin().evaluate(0.0).unwrap(), 0.0);
        assert_relative_eq!(Expr::Var.cos().evaluate(0.0).unwrap(), 1.0);
        assert_relative_eq!(Expr::Var.exp().evaluate(1.0).unwrap(), std::f64::consts::E);
        assert_relative_eq!(
            Expr::func(FunctionKind::Tan, Expr::Var).evaluate(0.5).unwrap(),
            0.5f64.tan()
        );
    }

    #[test]
    fn test_invalid_leaf_poisons_evaluation() {
        let expr = Expr::Var + Expr::Invalid;
        assert_eq!(expr.evaluate(1.0), None);
        let expr = Expr::Var.pow(Expr::Invalid);
        assert_eq!(expr.evaluate(1.0), None);
    }

    #[test]
    fn test_lambdify1D() {
        let expr = Expr::Var * Expr::Var - Expr::Const(1.0);
        let f = expr.lambdify1D();
        assert_relative_eq!(f(2.0).unwrap(), 3.0);
        assert_eq!(
            expr.evaluate_many(&[0.0, 1.0]),
            vec![Some(-1.0), Some(0.0)]
        );
    }
}
