//! The game built on top of the expression engine: curves are traced into runs of points,
//! dots are tested for hits, rounds are scored.
/// samples a function of x into continuous runs of points
pub mod curve_tracer;
/// dots on the field and the hit test
pub mod dot;
/// a round of up to five expressions played against a set of dots
pub mod game_round;
/// random placement of dots
pub mod layout;
/// 2^hits - 1 per expression, -1 on any bad hit
pub mod score;
/// tracer window, layout and seed, loaded from a text document
pub mod settings;
