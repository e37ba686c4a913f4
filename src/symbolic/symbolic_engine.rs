//! # Symbolic Engine Module
//!
//! The expression tree of the game: everything the player types is turned into an
//! [`Expr`] by the parser, printed back in canonical form and evaluated by the curve
//! tracer and the hit tester.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Leaves**: `Const(f64)` and `Var` (the single free variable "x")
//! - **n-ary nodes**: `Sum` of signed terms and `Product` of multiplied/divided factors
//! - **Binary node**: `Pow(base, exponent)`
//! - **Functions**: `Func(FunctionKind, argument)` for abs, exp, ln, sin, cos, tan
//! - **Sentinel**: `Invalid` - what the parser returns for malformed input
//!
//! ### Key Methods
//! - `print()` - canonical text that the parser reads back into an equal tree
//! - `evaluate(x)` - numeric value, `None` where the function is undefined
//!   (see `symbolic_lambdify.rs`)
//! - `precedence()` / `is_atomic()` - used to decide where printing needs parentheses
//!
//! ## Interesting Code Features
//!
//! 1. **n-ary Sum/Product**: subtraction and division are not separate nodes, each term
//!    of a `Sum` carries a [`Sign`] and each factor of a `Product` a [`FactorSign`]
//!
//! 2. **Multiset equality**: `a+b+c == c+b+a`, the order of terms and factors is
//!    irrelevant, their multiplicity and signs are not
//!
//! 3. **Tolerant constants**: two constants are equal when they differ by less than 1e-10

#![allow(non_camel_case_types)]

use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// tolerance used both for constant equality and for "division by zero" detection
pub const CONST_TOLERANCE: f64 = 1e-10;

/// Sign of a term inside a [`Expr::Sum`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Sign {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
}

impl Sign {
    pub fn from_char(c: char) -> Option<Sign> {
        match c {
            '+' => Some(Sign::Plus),
            '-' => Some(Sign::Minus),
            _ => None,
        }
    }
    pub fn factor(&self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

/// Role of a factor inside a [`Expr::Product`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum FactorSign {
    #[strum(to_string = "*")]
    Multiply,
    #[strum(to_string = "/")]
    Divide,
}

impl FactorSign {
    pub fn from_char(c: char) -> Option<FactorSign> {
        match c {
            '*' => Some(FactorSign::Multiply),
            '/' => Some(FactorSign::Divide),
            _ => None,
        }
    }
}

/// The closed family of single-argument functions.
/// The `Display` form is the name the parser accepts and the printer writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FunctionKind {
    Abs,
    Exp,
    Ln,
    Sin,
    Cos,
    Tan,
}

impl FunctionKind {
    /// the numeric function itself
    pub fn apply(&self, arg: f64) -> f64 {
        match self {
            FunctionKind::Abs => arg.abs(),
            FunctionKind::Exp => arg.exp(),
            FunctionKind::Ln => arg.ln(),
            FunctionKind::Sin => arg.sin(),
            FunctionKind::Cos => arg.cos(),
            FunctionKind::Tan => arg.tan(),
        }
    }
    /// domain check performed before `apply`
    pub fn accepts(&self, arg: f64) -> bool {
        match self {
            FunctionKind::Ln => arg.is_finite() && arg > 0.0,
            _ => arg.is_finite(),
        }
    }
}

/// Core symbolic expression enum: an immutable tree in one variable.
///
/// Every node exclusively owns its children, there is no sharing between trees.
///
/// # Examples
/// ```
/// use RustedGraphDots::symbolic::symbolic_engine::{Expr, Sign};
/// let expr = Expr::sum(vec![(Sign::Plus, Expr::Var), (Sign::Minus, Expr::Const(2.0))]);
/// assert_eq!(expr.print().unwrap(), "x-2");
/// ```
#[derive(Clone, Debug)]
pub enum Expr {
    /// Numerical constant value
    Const(f64),
    /// The free variable x
    Var,
    /// n-ary addition: each term carries its own sign
    Sum(Vec<(Sign, Expr)>),
    /// n-ary multiplication: each factor is either multiplied or divided
    Product(Vec<(FactorSign, Expr)>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Single-argument function
    Func(FunctionKind, Box<Expr>),
    /// "No expression": never evaluates, never prints
    Invalid,
}

impl Expr {
    /// BASIC FEATURES

    pub fn constant(value: f64) -> Expr {
        Expr::Const(value)
    }

    pub fn var() -> Expr {
        Expr::Var
    }

    pub fn sum(terms: Vec<(Sign, Expr)>) -> Expr {
        Expr::Sum(terms)
    }

    pub fn product(factors: Vec<(FactorSign, Expr)>) -> Expr {
        Expr::Product(factors)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn func(kind: FunctionKind, arg: Expr) -> Expr {
        Expr::Func(kind, arg.boxed())
    }

    pub fn abs(self) -> Expr {
        Expr::func(FunctionKind::Abs, self)
    }
    pub fn exp(self) -> Expr {
        Expr::func(FunctionKind::Exp, self)
    }
    pub fn ln(self) -> Expr {
        Expr::func(FunctionKind::Ln, self)
    }
    pub fn sin(self) -> Expr {
        Expr::func(FunctionKind::Sin, self)
    }
    pub fn cos(self) -> Expr {
        Expr::func(FunctionKind::Cos, self)
    }
    pub fn tan(self) -> Expr {
        Expr::func(FunctionKind::Tan, self)
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Expr::Invalid)
    }

    /// Precedence level used for print bracketing:
    /// leaves 0, Sum 1, Product 2, Pow and functions 3.
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Const(_) | Expr::Var | Expr::Invalid => 0,
            Expr::Sum(_) => 1,
            Expr::Product(_) => 2,
            Expr::Pow(_, _) | Expr::Func(_, _) => 3,
        }
    }

    /// An atomic expression never needs parentheses when it is a child of another node.
    /// Negative constants (-0 included) are not atomic: `x^-2` is not valid input,
    /// `x^(-2)` is.
    pub fn is_atomic(&self) -> bool {
        match self {
            Expr::Const(val) => !val.is_sign_negative(),
            Expr::Var | Expr::Invalid => true,
            Expr::Func(_, _) => true,
            Expr::Sum(_) | Expr::Product(_) | Expr::Pow(_, _) => false,
        }
    }

    //___________________________________PRINTING____________________________________

    /// Canonical text form of the expression, `None` if any part cannot be printed
    /// (an `Invalid` leaf, a non-finite constant, an empty Sum or Product).
    ///
    /// The output is parser input: parsing it back yields an equal expression.
    pub fn print(&self) -> Option<String> {
        match self {
            Expr::Invalid => None,
            Expr::Var => Some("x".to_string()),
            Expr::Const(val) => {
                if val.is_finite() {
                    Some(format!("{}", val))
                } else {
                    None
                }
            }
            Expr::Sum(terms) => {
                if terms.is_empty() {
                    return None;
                }
                let mut out = String::new();
                for (i, (sign, term)) in terms.iter().enumerate() {
                    let printed = term.print()?;
                    let printed = if Self::needs_parens_in_sum(term)
                        || (terms.len() == 1 && matches!(term, Expr::Const(_)))
                    {
                        format!("({})", printed)
                    } else {
                        printed
                    };
                    match (i, sign) {
                        // a lone positive term keeps its sign so the Sum survives reparsing
                        (0, Sign::Plus) if terms.len() == 1 => out.push('+'),
                        (0, Sign::Plus) => {}
                        _ => out.push_str(&sign.to_string()),
                    }
                    out.push_str(&printed);
                }
                Some(out)
            }
            Expr::Product(factors) => {
                if factors.is_empty() {
                    return None;
                }
                let mut out = String::new();
                for (i, (sign, factor)) in factors.iter().enumerate() {
                    let printed = factor.print()?;
                    let printed = if self.needs_parens_in_product(factor) {
                        format!("({})", printed)
                    } else {
                        printed
                    };
                    match (i, sign) {
                        (0, FactorSign::Multiply) => {}
                        (0, FactorSign::Divide) => out.push_str("1/"),
                        _ => out.push_str(&sign.to_string()),
                    }
                    out.push_str(&printed);
                }
                Some(out)
            }
            Expr::Pow(base, exp) => {
                let base_str = Self::decorate(base, base.print()?);
                let exp_str = Self::decorate(exp, exp.print()?);
                Some(format!("{}^{}", base_str, exp_str))
            }
            // function call syntax always brackets its argument
            Expr::Func(kind, arg) => Some(format!("{}({})", kind, arg.print()?)),
        }
    }

    fn decorate(child: &Expr, printed: String) -> String {
        if child.is_atomic() {
            printed
        } else {
            format!("({})", printed)
        }
    }

    fn needs_parens_in_sum(term: &Expr) -> bool {
        matches!(term, Expr::Sum(_)) || matches!(term, Expr::Const(val) if val.is_sign_negative())
    }

    fn needs_parens_in_product(&self, factor: &Expr) -> bool {
        let level = self.precedence();
        // Sum children (level - 1) always, nested Products to keep their grouping
        factor.precedence() == level - 1
            || factor.precedence() == level
            || matches!(factor, Expr::Const(val) if val.is_sign_negative())
    }
}

/// Display prints the canonical form, `<invalid>` when there is none.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.print() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "<invalid>"),
        }
    }
}

//___________________________________EQUALITY____________________________________

/// Structural equality: constants within [`CONST_TOLERANCE`], Sum/Product as multisets
/// of (sign, child) pairs, different node kinds never equal.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Const(a), Expr::Const(b)) => (a - b).abs() < CONST_TOLERANCE,
            (Expr::Var, Expr::Var) => true,
            (Expr::Invalid, Expr::Invalid) => true,
            (Expr::Sum(a), Expr::Sum(b)) => multiset_eq(a, b),
            (Expr::Product(a), Expr::Product(b)) => multiset_eq(a, b),
            (Expr::Pow(b1, e1), Expr::Pow(b2, e2)) => b1 == b2 && e1 == e2,
            (Expr::Func(k1, a1), Expr::Func(k2, a2)) => k1 == k2 && a1 == a2,
            (Expr::Const(_), _)
            | (Expr::Var, _)
            | (Expr::Invalid, _)
            | (Expr::Sum(_), _)
            | (Expr::Product(_), _)
            | (Expr::Pow(_, _), _)
            | (Expr::Func(_, _), _) => false,
        }
    }
}

/// Order-independent, duplicate-aware comparison of two lists of signed children.
/// Constants compare with a tolerance, so children cannot be hashed; every element of
/// `a` claims one not yet claimed equal element of `b`.
fn multiset_eq<S: PartialEq>(a: &[(S, Expr)], b: &[(S, Expr)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut claimed = vec![false; b.len()];
    for (sign, child) in a {
        let found = b
            .iter()
            .enumerate()
            .position(|(j, (other_sign, other_child))| {
                !claimed[j] && sign == other_sign && child == other_child
            });
        match found {
            Some(j) => claimed[j] = true,
            None => return false,
        }
    }
    true
}

//___________________________________OPERATORS____________________________________
// Operators build n-ary nodes, appending to an existing Sum/Product on the left.

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match self {
            Expr::Sum(mut terms) => {
                terms.push((Sign::Plus, rhs));
                Expr::Sum(terms)
            }
            lhs => Expr::Sum(vec![(Sign::Plus, lhs), (Sign::Plus, rhs)]),
        }
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        match self {
            Expr::Sum(mut terms) => {
                terms.push((Sign::Minus, rhs));
                Expr::Sum(terms)
            }
            lhs => Expr::Sum(vec![(Sign::Plus, lhs), (Sign::Minus, rhs)]),
        }
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match self {
            Expr::Product(mut factors) => {
                factors.push((FactorSign::Multiply, rhs));
                Expr::Product(factors)
            }
            lhs => Expr::Product(vec![(FactorSign::Multiply, lhs), (FactorSign::Multiply, rhs)]),
        }
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        match self {
            Expr::Product(mut factors) => {
                factors.push((FactorSign::Divide, rhs));
                Expr::Product(factors)
            }
            lhs => Expr::Product(vec![(FactorSign::Multiply, lhs), (FactorSign::Divide, rhs)]),
        }
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Sum(vec![(Sign::Minus, self)])
    }
}
