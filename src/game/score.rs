/// Score of a round.
///
/// Any hit on a bad dot voids the round: the score is -1. Otherwise every expression
/// contributes `2^hits - 1` for the good dots it hits, so one curve through several
/// dots is worth more than several curves through one dot each.
///
/// # Examples
/// ```
/// use RustedGraphDots::game::score::ScoreCalculator;
/// assert_eq!(ScoreCalculator::calculate_score(&[4, 0, 2], &[]), 18);
/// ```
pub struct ScoreCalculator;

impl ScoreCalculator {
    pub fn calculate_score(good_hits_per_expression: &[u32], bad_hits_per_expression: &[u32]) -> i32 {
        if bad_hits_per_expression.iter().any(|&hits| hits > 0) {
            return -1;
        }
        good_hits_per_expression
            .iter()
            .filter(|&&hits| hits > 0)
            .map(|&hits| Self::expression_bonus(hits))
            .fold(0i32, |acc, bonus| acc.saturating_add(bonus))
    }

    /// 2^hits - 1, saturating
    pub fn expression_bonus(hits: u32) -> i32 {
        2i32.saturating_pow(hits) - 1
    }
}

/// free-function form of [`ScoreCalculator::calculate_score`]
pub fn calculate_score(good_hits_per_expression: &[u32], bad_hits_per_expression: &[u32]) -> i32 {
    ScoreCalculator::calculate_score(good_hits_per_expression, bad_hits_per_expression)
}
