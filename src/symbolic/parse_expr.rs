//! a module turns a String expression into a symbolic expression
//!# Example
//! ```
//! use RustedGraphDots::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("3^x^2 - 1/x");
//! println!(" parsed_expression {}", parsed_expression);
//! assert_eq!(parsed_expression.evaluate(1.0), Some(2.0));
//! ```
use crate::symbolic::symbolic_engine::{Expr, FactorSign, FunctionKind, Sign};
use crate::symbolic::utils::{
    ALL_OPERATORS, brackets_are_balanced, find_operators_outside_brackets,
    find_pair_to_closing_bracket, is_enclosed_in_brackets, split_at_operators,
};
use log::{debug, trace};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use strum::IntoEnumIterator;
//                  search recursion diagram
//                "x^2*3-2/(x+1)"                   |
//                |_________________________________|
//                |     split by top-level + -      |
//                |_________________________________|
//                |   x^2*3     |   - 2/(x+1)       |
//                |_____\|/_____|________\|/________|
//                |  split by * /  |  split by * /  |
//                |   x^2  |   3   |   2  | (x+1)   |
//                |__\|/___|__Ok___|__Ok__|__\|/____|
//                | split by ^     |      | strip   |
//                |   x  |  2      |      | brackets|
//                |__Ok__|__Ok_____|______|__etc.___|

/// characters allowed in the input once function names are taken out
const ALLOWED_CHARS: &str = "-0123456789.+/*^()xX";

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]*\.?[0-9]*$").expect("number pattern is valid"));

impl Expr {
    /// Parses player input into an expression, `Expr::Invalid` on any syntax problem.
    pub fn parse_expression(input: &str) -> Expr {
        parse_expression_func(input)
    }
}

/// Parses player input into an expression.
///
/// Never fails: malformed input gives `Expr::Invalid`. Whitespace is ignored, `x` and
/// `X` both denote the variable, numbers use '.' as decimal point, `^` is right
/// associative and an exponent may not start with a bare sign (`x^-2` is rejected,
/// `x^(-2)` is accepted).
pub fn parse_expression_func(input: &str) -> Expr {
    let normalized: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if let Err(reason) = check_input(&normalized) {
        debug!("rejected expression '{}': {}", input, reason);
        return Expr::Invalid;
    }
    let expr = parse_normalized(&normalized);
    if expr.is_invalid() {
        debug!("expression '{}' could not be parsed", input);
    }
    expr
}

/// Character set, bracket balance and signed exponents.
fn check_input(input: &str) -> Result<(), String> {
    if input.is_empty() {
        return Err("empty input".to_string());
    }
    let mut without_functions = input.to_string();
    for kind in FunctionKind::iter() {
        without_functions = without_functions.replace(&kind.to_string(), "");
    }
    if let Some(c) = without_functions.chars().find(|c| !ALLOWED_CHARS.contains(*c)) {
        return Err(format!("unexpected character '{}'", c));
    }
    if !brackets_are_balanced(input) {
        return Err("unbalanced brackets".to_string());
    }
    if input.contains("^-") || input.contains("^+") {
        return Err("signed exponent must be put in brackets".to_string());
    }
    Ok(())
}

/// Recursive descent over an already normalized and checked string,
/// lowest precedence first.
fn parse_normalized(input: &str) -> Expr {
    trace!("parsing: {}", input);
    if input.is_empty() {
        return Expr::Invalid;
    }
    if is_enclosed_in_brackets(input) {
        return parse_normalized(&input[1..input.len() - 1]);
    }
    if input == "x" || input == "X" {
        return Expr::Var;
    }
    if NUMBER.is_match(input) {
        return match input.parse::<f64>() {
            Ok(value) => Expr::Const(value),
            Err(_) => Expr::Invalid,
        };
    }
    // "-(...)": a single signed term
    if let Some(sign) = input.chars().next().and_then(Sign::from_char) {
        if is_enclosed_in_brackets(&input[1..]) {
            let term = parse_normalized(&input[1..]);
            if term.is_invalid() {
                return Expr::Invalid;
            }
            return Expr::Sum(vec![(sign, term)]);
        }
    }
    if let Some(func) = parse_function_call(input) {
        return func;
    }

    let all_ops = find_operators_outside_brackets(input, &ALL_OPERATORS);
    if all_ops.iter().any(|(_, op)| Sign::from_char(*op).is_some()) {
        return parse_sum(input);
    }
    if all_ops.iter().any(|(_, op)| FactorSign::from_char(*op).is_some()) {
        return parse_product(input);
    }
    if !all_ops.is_empty() {
        return parse_power(input, &all_ops);
    }
    Expr::Invalid
}

/// "name(argument)" for one of the known functions
fn parse_function_call(input: &str) -> Option<Expr> {
    if !input.ends_with(')') {
        return None;
    }
    let open = find_pair_to_closing_bracket(input, input.len() - 1)?;
    if open == 0 {
        return None;
    }
    let kind = FunctionKind::from_str(&input[..open]).ok()?;
    let argument = parse_normalized(&input[open + 1..input.len() - 1]);
    if argument.is_invalid() {
        return Some(Expr::Invalid);
    }
    Some(Expr::Func(kind, argument.boxed()))
}

fn parse_sum(input: &str) -> Expr {
    let ops = find_operators_outside_brackets(input, &['+', '-']);
    let (head, tail) = split_at_operators(input, &ops);
    let mut terms = Vec::with_capacity(tail.len() + 1);
    // a leading sign leaves an empty head: the first term is signed by it
    let leading_sign = ops.first().is_some_and(|(pos, _)| *pos == 0);
    if !leading_sign {
        terms.push((Sign::Plus, parse_normalized(head)));
    }
    for (op, segment) in tail {
        let Some(sign) = Sign::from_char(op) else {
            return Expr::Invalid;
        };
        terms.push((sign, parse_normalized(segment)));
    }
    if terms.iter().any(|(_, term)| term.is_invalid()) {
        return Expr::Invalid;
    }
    Expr::Sum(terms)
}

fn parse_product(input: &str) -> Expr {
    let ops = find_operators_outside_brackets(input, &['*', '/']);
    let (head, tail) = split_at_operators(input, &ops);
    let mut factors = Vec::with_capacity(tail.len() + 1);
    factors.push((FactorSign::Multiply, parse_normalized(head)));
    for (op, segment) in tail {
        let Some(sign) = FactorSign::from_char(op) else {
            return Expr::Invalid;
        };
        factors.push((sign, parse_normalized(segment)));
    }
    if factors.iter().any(|(_, factor)| factor.is_invalid()) {
        return Expr::Invalid;
    }
    Expr::Product(factors)
}

/// base ^ (everything after the first ^): towers associate to the right
fn parse_power(input: &str, ops: &[(usize, char)]) -> Expr {
    if ops.iter().any(|(_, op)| *op != '^') {
        return Expr::Invalid;
    }
    let first = ops[0].0;
    let base = parse_normalized(&input[..first]);
    let exponent = parse_normalized(&input[first + 1..]);
    if base.is_invalid() || exponent.is_invalid() {
        return Expr::Invalid;
    }
    Expr::Pow(base.boxed(), exponent.boxed())
}
