//! One round of the game: a set of dots and up to five expressions typed by the player.
//!
//! Playing the round parses every expression, traces its curve, tests every dot against
//! it and scores the result. Slots are independent, they are processed in parallel and
//! each one draws from its own random source seeded from the game seed and the slot
//! index, so a round always scores the same.
use crate::game::curve_tracer::PointRun;
use crate::game::dot::{Dot, DotKind};
use crate::game::layout::generate_dots;
use crate::game::score::calculate_score;
use crate::game::settings::GameSettings;
use crate::symbolic::parse_expr::parse_expression_func;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// number of expression slots of a round
pub const EXPRESSION_SLOTS: usize = 5;

#[derive(Clone, Debug, Default)]
pub struct GameRound {
    pub dots: Vec<Dot>,
    pub expressions: [String; EXPRESSION_SLOTS],
}

/// What one expression slot achieved
#[derive(Clone, Debug)]
pub struct ExpressionOutcome {
    pub slot: usize,
    /// the text typed by the player
    pub text: String,
    /// canonical form, `None` for an empty or unparsable slot
    pub printed: Option<String>,
    pub runs: Vec<PointRun>,
    pub good_hits: u32,
    pub bad_hits: u32,
}

#[derive(Tabled)]
struct OutcomeRow {
    slot: usize,
    expression: String,
    runs: usize,
    good: u32,
    bad: u32,
}

#[derive(Clone, Debug)]
pub struct RoundResult {
    pub outcomes: Vec<ExpressionOutcome>,
    pub score: i32,
}

impl RoundResult {
    pub fn good_hits(&self) -> Vec<u32> {
        self.outcomes.iter().map(|o| o.good_hits).collect()
    }

    pub fn bad_hits(&self) -> Vec<u32> {
        self.outcomes.iter().map(|o| o.bad_hits).collect()
    }

    /// the outcomes as a text table, one row per slot
    pub fn table(&self) -> String {
        let rows: Vec<OutcomeRow> = self
            .outcomes
            .iter()
            .map(|o| OutcomeRow {
                slot: o.slot,
                expression: match (&o.printed, o.text.trim().is_empty()) {
                    (Some(printed), _) => printed.clone(),
                    (None, true) => String::new(),
                    (None, false) => format!("invalid: {}", o.text.trim()),
                },
                runs: o.runs.len(),
                good: o.good_hits,
                bad: o.bad_hits,
            })
            .collect();
        let mut table = Table::new(&rows);
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

impl GameRound {
    pub fn new(dots: Vec<Dot>) -> Self {
        GameRound {
            dots,
            expressions: Default::default(),
        }
    }

    /// A round with dots laid out from the settings seed.
    pub fn generate(settings: &GameSettings) -> Self {
        let mut rng = StdRng::seed_from_u64(settings.seed);
        Self::new(generate_dots(&mut rng, settings))
    }

    /// Panics if `slot` is not below [`EXPRESSION_SLOTS`].
    pub fn set_expression(&mut self, slot: usize, text: &str) {
        assert!(
            slot < EXPRESSION_SLOTS,
            "expression slot {} out of range, a round has {} slots",
            slot,
            EXPRESSION_SLOTS
        );
        self.expressions[slot] = text.to_string();
    }

    pub fn play(&self, settings: &GameSettings) -> RoundResult {
        let tracer = settings.tracer();
        let outcomes: Vec<ExpressionOutcome> = self
            .expressions
            .par_iter()
            .enumerate()
            .map(|(slot, text)| {
                let mut outcome = ExpressionOutcome {
                    slot,
                    text: text.clone(),
                    printed: None,
                    runs: Vec::new(),
                    good_hits: 0,
                    bad_hits: 0,
                };
                if text.trim().is_empty() {
                    return outcome;
                }
                let expr = parse_expression_func(text);
                if expr.is_invalid() {
                    debug!("slot {}: '{}' is not an expression", slot, text);
                    return outcome;
                }
                outcome.printed = expr.print();
                outcome.runs = tracer.trace(&expr);
                let mut rng = StdRng::seed_from_u64(settings.seed.wrapping_add(slot as u64));
                for dot in &self.dots {
                    if dot.is_hit(&expr, Some(&outcome.runs), &mut rng) {
                        match dot.kind {
                            DotKind::Good => outcome.good_hits += 1,
                            DotKind::Bad => outcome.bad_hits += 1,
                        }
                    }
                }
                info!(
                    "slot {}: {} hits {} good and {} bad dots",
                    slot, expr, outcome.good_hits, outcome.bad_hits
                );
                outcome
            })
            .collect();
        let good: Vec<u32> = outcomes.iter().map(|o| o.good_hits).collect();
        let bad: Vec<u32> = outcomes.iter().map(|o| o.bad_hits).collect();
        let score = calculate_score(&good, &bad);
        info!("round played with {} dots, score {}", self.dots.len(), score);
        RoundResult { outcomes, score }
    }
}
