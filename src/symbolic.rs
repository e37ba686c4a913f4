/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedGraphDots::symbolic::symbolic_engine::Expr;
/// let input = "2*x + 1";
/// let parsed_expression = Expr::parse_expression(input);
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.print().unwrap(), "2*x+1");
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) keeps the expression tree of a function of one variable x
/// 2) compares trees (order of terms and factors does not matter)
/// 3) turns a symbolic expression into a canonical string that parses back into the same tree
///# Example#
/// ```
/// use RustedGraphDots::symbolic::symbolic_engine::Expr;
/// let expr = (Expr::Var + Expr::Const(1.0)) / (Expr::Var - Expr::Const(1.0));
/// let printed = expr.print().unwrap();
/// assert_eq!(printed, "(x+1)/(x-1)");
/// assert_eq!(Expr::parse_expression(&printed), expr);
/// ```
pub mod symbolic_engine;
/// turns a symbolic expression into a Rust function of x, undefined points give None
///# Example
/// ```
/// use RustedGraphDots::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("ln(x)");
/// let f = expr.lambdify1D();
/// assert_eq!(f(1.0), Some(0.0));
/// assert_eq!(f(-1.0), None);
/// ```
pub mod symbolic_lambdify;
/// bracket and operator scanning used by the parser
pub mod utils;
