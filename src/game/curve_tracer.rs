//! # Curve tracer
//!
//! Samples a partial function of x over an interval into runs of points. A run is a
//! continuous, singularity-free branch of the curve: `1/x` over [-1, 1] gives two runs,
//! one on each side of the pole.
//!
//! The tracer scans the interval with a coarse step until the function is defined,
//! then walks from that seed in both directions with an adaptive step that keeps the
//! distance between consecutive points inside a band: the step is halved when the next
//! point lands too far away and doubled when it lands too close. A run ends where the
//! function becomes undefined, leaves the window, exceeds the y clamp or jumps (the
//! step cannot be made small enough to close the gap).
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, trace};

/// A point in the logical coordinates of the game field (not pixels)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLogical {
    pub x: f64,
    pub y: f64,
}

impl PointLogical {
    pub fn new(x: f64, y: f64) -> Self {
        PointLogical { x, y }
    }

    pub fn distance_squared(&self, other: &PointLogical) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }
}

/// One continuous branch of a traced curve, sorted by x
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointRun {
    points: Vec<PointLogical>,
}

impl PointRun {
    /// Builds a run from points, sorting them by x.
    pub fn new(mut points: Vec<PointLogical>) -> Self {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        PointRun { points }
    }

    /// Inserts a point keeping the run sorted by x.
    pub fn insert(&mut self, point: PointLogical) {
        let at = self.points.partition_point(|p| p.x <= point.x);
        self.points.insert(at, point);
    }

    pub fn points(&self) -> &[PointLogical] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PointLogical> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PointLogical> {
        self.points.last()
    }

    /// the points whose x lies in [x_min, x_max]
    pub fn points_in_window(&self, x_min: f64, x_max: f64) -> &[PointLogical] {
        let start = self.points.partition_point(|p| p.x < x_min);
        let end = self.points.partition_point(|p| p.x <= x_max);
        &self.points[start..end.max(start)]
    }
}

/// Sampling parameters of the tracer
#[derive(Clone, Debug, PartialEq)]
pub struct TracerSettings {
    /// step of the coarse scan looking for a seed of the next run
    pub large_increment: f64,
    /// initial step of the adaptive walk
    pub small_increment: f64,
    /// consecutive points closer than this (squared) make the step grow
    pub min_distance_squared: f64,
    /// consecutive points farther than this (squared) make the step shrink
    pub max_distance_squared: f64,
    /// below this step a too-far point is a jump: the run ends
    pub min_step: f64,
    /// safety cap on the number of points of one walk
    pub max_points_per_walk: usize,
}

impl Default for TracerSettings {
    fn default() -> Self {
        TracerSettings {
            large_increment: 0.1,
            small_increment: 0.001,
            min_distance_squared: 0.0004,
            max_distance_squared: 0.01,
            min_step: 1e-9,
            max_points_per_walk: 200_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Direction {
    Backward,
    Forward,
}

impl Direction {
    fn factor(&self) -> f64 {
        match self {
            Direction::Backward => -1.0,
            Direction::Forward => 1.0,
        }
    }
}

/// Traces expressions over a window `[x_start, x_end]` with values clamped to ±`y_limit`.
#[derive(Clone, Debug)]
pub struct CurveTracer {
    pub x_start: f64,
    pub x_end: f64,
    pub y_limit: f64,
    pub settings: TracerSettings,
}

impl CurveTracer {
    /// Panics if `x_start >= x_end`.
    pub fn new(x_start: f64, x_end: f64, y_limit: f64) -> Self {
        Self::with_settings(x_start, x_end, y_limit, TracerSettings::default())
    }

    pub fn with_settings(x_start: f64, x_end: f64, y_limit: f64, settings: TracerSettings) -> Self {
        assert!(
            x_start < x_end,
            "tracing window must be non-empty: x_start = {}, x_end = {}",
            x_start,
            x_end
        );
        assert!(
            settings.large_increment > 0.0 && settings.small_increment > 0.0,
            "tracer increments must be positive"
        );
        CurveTracer {
            x_start,
            x_end,
            y_limit,
            settings,
        }
    }

    /// Samples `expr` into runs of points ordered by x.
    pub fn trace(&self, expr: &Expr) -> Vec<PointRun> {
        let mut runs = Vec::new();
        if expr.is_invalid() {
            return runs;
        }
        let f = expr.lambdify1D();
        let mut cursor = self.x_start;
        while cursor <= self.x_end {
            match self.sample(&f, cursor) {
                Some(seed) => {
                    let backward = self.walk(&f, seed, Direction::Backward);
                    let forward = self.walk(&f, seed, Direction::Forward);
                    let mut points = Vec::with_capacity(backward.len() + forward.len() + 1);
                    points.extend(backward.into_iter().rev());
                    points.push(seed);
                    points.extend(forward);
                    let run = PointRun::new(points);
                    let end = run.last().map_or(seed.x, |p| p.x);
                    trace!("run from x = {} to x = {}, {} points", seed.x, end, run.len());
                    runs.push(run);
                    cursor = end + self.settings.large_increment;
                }
                None => cursor += self.settings.large_increment,
            }
        }
        debug!("traced {} into {} runs", expr, runs.len());
        runs
    }

    /// defined, inside the clamp
    fn sample(&self, f: &dyn Fn(f64) -> Option<f64>, x: f64) -> Option<PointLogical> {
        let y = f(x)?;
        if y.is_finite() && y.abs() <= self.y_limit {
            Some(PointLogical::new(x, y))
        } else {
            None
        }
    }

    /// Points reached from `seed` in one direction, nearest first, seed excluded.
    fn walk(
        &self,
        f: &dyn Fn(f64) -> Option<f64>,
        seed: PointLogical,
        direction: Direction,
    ) -> Vec<PointLogical> {
        let s = &self.settings;
        let boundary = match direction {
            Direction::Backward => self.x_start,
            Direction::Forward => self.x_end,
        };
        let mut points = Vec::new();
        let mut previous = seed;
        let mut step = s.small_increment;
        while points.len() < s.max_points_per_walk {
            if previous.x == boundary {
                break;
            }
            let mut x = previous.x + direction.factor() * step;
            let beyond = match direction {
                Direction::Backward => x < boundary,
                Direction::Forward => x > boundary,
            };
            if beyond {
                x = boundary;
            }
            let Some(candidate) = self.sample(f, x) else {
                // close in on the edge of the domain before giving up
                if step > s.small_increment {
                    step = (x - previous.x).abs() / 2.0;
                    continue;
                }
                break;
            };
            let distance = candidate.distance_squared(&previous);
            if distance > s.max_distance_squared {
                if step < s.min_step {
                    // the gap cannot be closed: a jump in the function
                    break;
                }
                step = (x - previous.x).abs() / 2.0;
                continue;
            }
            points.push(candidate);
            previous = candidate;
            if distance < s.min_distance_squared {
                step *= 2.0;
            }
        }
        points
    }
}

/// Traces `expr` over `[x_start, x_end]` with default sampling settings.
///
/// Panics if `x_start >= x_end`.
pub fn trace(expr: &Expr, x_start: f64, x_end: f64, y_limit: f64) -> Vec<PointRun> {
    CurveTracer::new(x_start, x_end, y_limit).trace(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr::parse_expression_func;
    use approx::assert_relative_eq;

    fn assert_run_is_sorted_and_dense(run: &PointRun, settings: &TracerSettings) {
        for pair in run.points().windows(2) {
            assert!(pair[0].x < pair[1].x, "run not sorted: {:?}", pair);
            assert!(pair[0].distance_squared(&pair[1]) <= settings.max_distance_squared + 1e-12);
        }
    }

    #[test]
    fn test_hyperbola_splits_at_pole() {
        let expr = parse_expression_func("1/x");
        let runs = trace(&expr, -1.0, 1.0, 1000.0);
        assert_eq!(runs.len(), 2);
        let left = &runs[0];
        let right = &runs[1];
        assert_relative_eq!(left.first().unwrap().x, -1.0);
        assert!(left.last().unwrap().x < 0.0);
        assert!(right.first().unwrap().x > 0.0);
        assert_relative_eq!(right.last().unwrap().x, 1.0);
        for run in &runs {
            assert!(run.points().iter().all(|p| p.y.abs() <= 1000.0));
            assert_run_is_sorted_and_dense(run, &TracerSettings::default());
        }
    }

    #[test]
    fn test_line_is_one_run_over_whole_window() {
        let expr = parse_expression_func("2*x+1");
        let runs = trace(&expr, -10.0, 10.0, 1000.0);
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_relative_eq!(run.first().unwrap().x, -10.0);
        assert_relative_eq!(run.last().unwrap().x, 10.0);
        for p in run.points() {
            assert_relative_eq!(p.y, 2.0 * p.x + 1.0, epsilon = 1e-9);
        }
        assert_run_is_sorted_and_dense(run, &TracerSettings::default());
    }

    #[test]
    fn test_partial_domain() {
        let expr = parse_expression_func("ln(x)");
        let runs = trace(&expr, -5.0, 5.0, 1000.0);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].first().unwrap().x > 0.0);
        assert_relative_eq!(runs[0].last().unwrap().x, 5.0);
    }

    #[test]
    fn test_clamp_cuts_steep_curve() {
        let expr = parse_expression_func("x^2");
        let runs = trace(&expr, -10.0, 10.0, 25.0);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].first().unwrap().x >= -5.0);
        assert!(runs[0].last().unwrap().x <= 5.0);
    }

    #[test]
    fn test_undefined_everywhere_and_invalid() {
        let expr = parse_expression_func("ln(-1-x^2)");
        assert!(trace(&expr, -5.0, 5.0, 1000.0).is_empty());
        assert!(trace(&Expr::Invalid, -5.0, 5.0, 1000.0).is_empty());
    }

    #[test]
    fn test_tangent_has_several_branches() {
        let expr = parse_expression_func("tan(x)");
        // poles at ±pi/2 inside [-3, 3]
        let runs = trace(&expr, -3.0, 3.0, 100.0);
        assert_eq!(runs.len(), 3);
    }

    #[test]
    #[should_panic]
    fn test_empty_window_panics() {
        trace(&Expr::Var, 1.0, 1.0, 10.0);
    }

    #[test]
    fn test_point_run_insert_keeps_order() {
        let mut run = PointRun::new(vec![PointLogical::new(2.0, 0.0), PointLogical::new(0.0, 0.0)]);
        run.insert(PointLogical::new(1.0, 5.0));
        let xs: Vec<f64> = run.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        assert_eq!(run.points_in_window(0.5, 2.0).len(), 2);
        assert!(run.points_in_window(3.0, 4.0).is_empty());
    }
}
