// the collection of utility functions mainly for bracket parsing and proceeding

/// every binary operator the expression grammar knows
pub const ALL_OPERATORS: [char; 5] = ['+', '-', '*', '/', '^'];

/// true if every ')' closes an earlier '(' and nothing stays open
pub fn brackets_are_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Position of the ')' closing the '(' at `bracket_start`, `None` if it is never closed.
///
/// Works on byte positions, the input is expected to be ASCII.
/// Panics if `bracket_start` is out of range or does not point at '('.
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    assert!(
        bracket_start < bytes.len(),
        "bracket index {} out of range for input of length {}",
        bracket_start,
        bytes.len()
    );
    assert_eq!(bytes[bracket_start], b'(', "no opening bracket at {}", bracket_start);
    let mut stack = 0usize;
    for (i, &c) in bytes.iter().enumerate().skip(bracket_start) {
        if c == b'(' {
            stack += 1;
        } else if c == b')' {
            stack -= 1;
            if stack == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Position of the '(' opened for the ')' at `bracket_end`, scanning right to left.
///
/// Panics if `bracket_end` is out of range or does not point at ')'.
pub fn find_pair_to_closing_bracket(input: &str, bracket_end: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    assert!(
        bracket_end < bytes.len(),
        "bracket index {} out of range for input of length {}",
        bracket_end,
        bytes.len()
    );
    assert_eq!(bytes[bracket_end], b')', "no closing bracket at {}", bracket_end);
    let mut stack = 0usize;
    for i in (0..=bracket_end).rev() {
        if bytes[i] == b')' {
            stack += 1;
        } else if bytes[i] == b'(' {
            stack -= 1;
            if stack == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// true if the whole string is one bracketed group: "(x+1)" but not "(x)+(1)"
pub fn is_enclosed_in_brackets(input: &str) -> bool {
    input.starts_with('(') && find_pair_to_this_bracket(input, 0) == Some(input.len() - 1)
}

/// Operators found outside of any bracket, with their byte positions.
///
/// A '+' or '-' standing where an operand is expected (directly after another
/// operator) is a sign glued to that operand and is not reported. A sign at the very
/// start of the input is reported: it is the sign of the first term.
pub fn find_operators_outside_brackets(input: &str, operators: &[char]) -> Vec<(usize, char)> {
    let mut depth = 0usize;
    let mut positions = Vec::new();
    let mut expect_operand = true;
    for (i, c) in input.char_indices() {
        match c {
            '(' => {
                depth += 1;
                expect_operand = false;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                expect_operand = false;
            }
            _ if depth == 0 && ALL_OPERATORS.contains(&c) => {
                let unary = expect_operand && i > 0 && (c == '+' || c == '-');
                if !unary && operators.contains(&c) {
                    positions.push((i, c));
                }
                expect_operand = true;
            }
            _ if depth == 0 => expect_operand = false,
            _ => {}
        }
    }
    positions
}

/// Cuts `input` at the given operator positions. Returns the leading segment and,
/// for every operator, the operator with the segment that follows it.
pub fn split_at_operators<'a>(
    input: &'a str,
    operators: &[(usize, char)],
) -> (&'a str, Vec<(char, &'a str)>) {
    let first_end = operators.first().map(|(pos, _)| *pos).unwrap_or(input.len());
    let head = &input[..first_end];
    let mut tail = Vec::with_capacity(operators.len());
    for (k, (pos, op)) in operators.iter().enumerate() {
        let end = operators.get(k + 1).map(|(p, _)| *p).unwrap_or(input.len());
        tail.push((*op, &input[pos + 1..end]));
    }
    (head, tail)
}
