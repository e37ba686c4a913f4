//! # Dots and hit testing
//!
//! A dot is a circle of fixed radius on the game field. A curve hits the dot when it
//! passes within the radius of its centre. Two strategies are combined:
//!
//! 1. **list-based**: look for a traced sample point inside the circle
//! 2. **greedy local search**: evaluate the expression itself around the dot and move
//!    towards the side that gets closer to the centre, catching features the tracer
//!    stepped over (near-vertical branches, thin spikes)
//!
//! The search is bounded (10 000 iterations, step above 1e-6) and uses a random jump
//! only when none of its probes is defined; the random source is passed in by the
//! caller so tests stay reproducible.
use crate::game::curve_tracer::{PointLogical, PointRun};
use crate::symbolic::symbolic_engine::Expr;
use log::trace;
use rand::Rng;
use strum_macros::{Display, EnumString};

/// radius of every dot, in logical units
pub const DOT_RADIUS: f64 = 0.25;

const SEARCH_MAX_ITERATIONS: usize = 10_000;
const SEARCH_MIN_STEP: f64 = 1e-6;
/// below this squared distance the step shrinks with the distance, above it by STEP_DECAY
const GRADIENT_THRESHOLD: f64 = 10.0;
const STEP_DECAY: f64 = 0.75;
/// move damping when one of the three probes is undefined
const PARTIAL_DAMPING: f64 = 0.8;
/// random restarts land within this fraction of the radius around the centre
const RESTART_SPREAD: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DotKind {
    /// hitting it scores
    Good,
    /// hitting it voids the round
    Bad,
}

/// Immutable scoring target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    pub x: f64,
    pub y: f64,
    pub kind: DotKind,
}

impl Dot {
    pub fn new(x: f64, y: f64, kind: DotKind) -> Self {
        Dot { x, y, kind }
    }

    pub fn good(x: f64, y: f64) -> Self {
        Dot::new(x, y, DotKind::Good)
    }

    pub fn bad(x: f64, y: f64) -> Self {
        Dot::new(x, y, DotKind::Bad)
    }

    pub fn radius(&self) -> f64 {
        DOT_RADIUS
    }

    pub fn center(&self) -> PointLogical {
        PointLogical::new(self.x, self.y)
    }

    fn distance_squared(&self, x: f64, y: f64) -> f64 {
        (x - self.x).powi(2) + (y - self.y).powi(2)
    }

    /// inside or on the circle
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.distance_squared(x, y) <= DOT_RADIUS * DOT_RADIUS
    }

    /// Decides whether the curve of `expr` hits this dot.
    ///
    /// `runs` are the traced point runs of `expr`, if the caller has them. The
    /// `Invalid` expression never hits.
    pub fn is_hit<R: Rng>(
        &self,
        expr: &Expr,
        runs: Option<&[PointRun]>,
        rng: &mut R,
    ) -> bool {
        if expr.is_invalid() {
            return false;
        }
        if let Some(runs) = runs {
            if self.is_hit_by_points(runs) {
                return true;
            }
        }
        self.is_hit_by_search(expr, rng)
    }

    /// List-based test: any sample point of any run inside the circle.
    /// Runs may overlap, each one is scanned on its own.
    pub fn is_hit_by_points(&self, runs: &[PointRun]) -> bool {
        let (x_min, x_max) = (self.x - DOT_RADIUS, self.x + DOT_RADIUS);
        runs.iter().any(|run| {
            run.points_in_window(x_min, x_max)
                .iter()
                .any(|p| self.contains(p.x, p.y))
        })
    }

    /// Greedy local search for a point of the curve inside the circle.
    pub fn is_hit_by_search<R: Rng>(&self, expr: &Expr, rng: &mut R) -> bool {
        if expr.is_invalid() {
            return false;
        }
        let f = expr.lambdify1D();
        let mut mid = self.x;
        let mut step = DOT_RADIUS;
        for iteration in 0..SEARCH_MAX_ITERATIONS {
            if step < SEARCH_MIN_STEP {
                trace!("search around ({}, {}) stopped after {} iterations", self.x, self.y, iteration);
                return false;
            }
            let probes = [mid - step, mid, mid + step].map(|x| {
                f(x).filter(|y| y.is_finite()).map(|y| (x, self.distance_squared(x, y)))
            });
            if probes
                .iter()
                .flatten()
                .any(|(_, d2)| *d2 <= DOT_RADIUS * DOT_RADIUS)
            {
                return true;
            }
            match probes {
                [Some((_, left)), Some(_), Some((_, right))] => {
                    let side_distance = if left < right {
                        mid -= step;
                        left
                    } else {
                        mid += step;
                        right
                    };
                    if side_distance < GRADIENT_THRESHOLD {
                        step *= side_distance / GRADIENT_THRESHOLD;
                    } else {
                        step *= STEP_DECAY;
                    }
                }
                [Some((_, left)), None, Some((_, right))] => {
                    if left < right {
                        mid -= PARTIAL_DAMPING * step;
                    } else {
                        mid += PARTIAL_DAMPING * step;
                    }
                    step *= 0.5;
                }
                [Some(_), Some(_), None] => {
                    mid -= PARTIAL_DAMPING * step;
                    step *= 0.5;
                }
                [None, Some(_), Some(_)] => {
                    mid += PARTIAL_DAMPING * step;
                    step *= 0.5;
                }
                // one defined probe: move onto it, the step is kept
                [Some((x, _)), None, None] | [None, Some((x, _)), None] | [None, None, Some((x, _))] => {
                    mid = x;
                }
                [None, None, None] => {
                    let spread = RESTART_SPREAD * DOT_RADIUS;
                    mid = self.x + rng.random_range(-spread..=spread);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::curve_tracer::trace;
    use crate::symbolic::parse_expr::parse_expression_func;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_tangent_line_hits() {
        let dot = Dot::good(0.0, 0.0);
        let expr = parse_expression_func("0.25");
        assert!(dot.is_hit(&expr, None, &mut rng()));
        assert!(dot.contains(0.0, 0.25));
    }

    #[test]
    fn test_line_just_outside_misses() {
        let dot = Dot::good(0.0, 0.0);
        let expr = parse_expression_func("0.3");
        let runs = trace(&expr, -10.0, 10.0, 1000.0);
        assert!(!dot.is_hit_by_points(&runs));
        assert!(!dot.is_hit(&expr, Some(&runs), &mut rng()));
    }

    #[test]
    fn test_search_finds_steep_branch() {
        // crosses y = 0 at x = 0.1 with slope -100
        let dot = Dot::good(0.0, 0.0);
        let expr = parse_expression_func("1/x-10");
        assert!(dot.is_hit_by_search(&expr, &mut rng()));
        assert!(dot.is_hit(&expr, None, &mut rng()));
    }

    #[test]
    fn test_search_misses_far_curve() {
        let dot = Dot::good(0.0, 0.0);
        let expr = parse_expression_func("x^2+1");
        assert!(!dot.is_hit_by_search(&expr, &mut rng()));
        let runs = trace(&expr, -10.0, 10.0, 1000.0);
        assert!(!dot.is_hit(&expr, Some(&runs), &mut rng()));
    }

    #[test]
    fn test_points_hit_off_centre_dot() {
        let dot = Dot::bad(3.0, 7.0);
        let expr = parse_expression_func("2*x+1");
        let runs = trace(&expr, -10.0, 10.0, 1000.0);
        assert!(dot.is_hit_by_points(&runs));
        assert!(dot.is_hit(&expr, Some(&runs), &mut rng()));
    }

    #[test]
    fn test_overlapping_runs_are_all_scanned() {
        let dot = Dot::good(1.0, 1.0);
        let miss = PointRun::new(vec![PointLogical::new(0.9, 5.0), PointLogical::new(1.1, 5.0)]);
        let hit = PointRun::new(vec![PointLogical::new(0.95, 1.1)]);
        assert!(dot.is_hit_by_points(&[miss.clone(), hit]));
        assert!(!dot.is_hit_by_points(&[miss]));
    }

    #[test]
    fn test_invalid_expression_never_hits() {
        let dot = Dot::good(0.0, 0.0);
        let runs = vec![PointRun::new(vec![PointLogical::new(0.0, 0.0)])];
        assert!(!dot.is_hit(&Expr::Invalid, Some(&runs), &mut rng()));
    }

    #[test]
    fn test_search_with_undefined_centre() {
        // the left probe of the first iteration is outside the domain of ln
        let dot = Dot::good(0.05, -2.0);
        let expr = parse_expression_func("ln(x)");
        assert!(dot.is_hit_by_search(&expr, &mut rng()));
    }

    #[test]
    fn test_search_keeps_step_when_only_centre_is_defined() {
        // defined on [-0.1, 0.1] only, peak 0.3 at x = 0: the side probes never land
        // in the domain, the centre stays just outside the circle
        let dot = Dot::good(0.0, 0.0);
        let expr = parse_expression_func("3*(0.01-x^2)^0.5");
        assert_eq!(expr.evaluate(0.25), None);
        assert!(!dot.is_hit_by_search(&expr, &mut StdRng::seed_from_u64(1)));
    }

    #[test]
    fn test_search_restarts_in_dead_zone() {
        // every probe and every random restart stays at x < 0 where ln is undefined
        let dot = Dot::good(-0.5, 0.0);
        let expr = parse_expression_func("ln(x)");
        for seed in [1, 2, 42] {
            assert!(!dot.is_hit_by_search(&expr, &mut StdRng::seed_from_u64(seed)));
        }
    }

    #[test]
    fn test_outcome_does_not_depend_on_seed() {
        let expr = parse_expression_func("1/x-10");
        let hit = Dot::good(0.0, 0.0);
        let miss = Dot::bad(-0.5, 5.0);
        for seed in [7, 1234] {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(hit.is_hit(&expr, None, &mut rng));
            assert!(!miss.is_hit(&expr, None, &mut rng));
        }
    }

    #[test]
    fn test_dot_kind_names() {
        assert_eq!(DotKind::Good.to_string(), "good");
        assert_eq!("bad".parse::<DotKind>().unwrap(), DotKind::Bad);
    }
}
