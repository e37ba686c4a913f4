//! Game settings and their text form.
//!
//! ```text
//! tracer
//!  x_start: -10
//!  x_end: 10
//!  y_limit: 1000
//!  large_increment: 0.1
//!  small_increment: 0.001
//!  min_distance_squared: 0.0004
//!  max_distance_squared: 0.01
//! layout
//!  good_dots: 6
//!  bad_dots: 3
//!  x_min: -9
//!  x_max: 9
//!  y_min: -9
//!  y_max: 9
//! game
//!  seed: 42
//! ```
//! Every key is optional, a missing one keeps its default value.
use crate::Utils::task_parser::{SectionMap, Value, parse_document};
use crate::game::curve_tracer::{CurveTracer, TracerSettings};
use log::info;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub x_start: f64,
    pub x_end: f64,
    /// traced values with |y| above this are dropped
    pub y_limit: f64,
    pub tracer: TracerSettings,
    pub good_dots: usize,
    pub bad_dots: usize,
    /// area where dot centres are placed
    pub layout_x: (f64, f64),
    pub layout_y: (f64, f64),
    pub seed: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            x_start: -10.0,
            x_end: 10.0,
            y_limit: 1000.0,
            tracer: TracerSettings::default(),
            good_dots: 6,
            bad_dots: 3,
            layout_x: (-9.0, 9.0),
            layout_y: (-9.0, 9.0),
            seed: 0,
        }
    }
}

fn single_value<'a>(section: &str, key: &str, values: &'a [Value]) -> Result<&'a Value, String> {
    match values {
        [value] => Ok(value),
        _ => Err(format!(
            "{}.{}: expected exactly one value, found {}",
            section,
            key,
            values.len()
        )),
    }
}

fn float_value(section: &str, key: &str, values: &[Value]) -> Result<f64, String> {
    let value = single_value(section, key, values)?;
    value
        .as_float()
        .ok_or_else(|| format!("{}.{}: '{}' is not a number", section, key, value))
}

fn count_value(section: &str, key: &str, values: &[Value]) -> Result<usize, String> {
    let value = single_value(section, key, values)?;
    value
        .as_integer()
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| format!("{}.{}: '{}' is not a non-negative integer", section, key, value))
}

impl GameSettings {
    /// Parses a settings document, starting from the defaults.
    pub fn from_document(input: &str) -> Result<Self, String> {
        let document = parse_document(input)?;
        let mut settings = GameSettings::default();
        for (title, section) in &document {
            match title.as_str() {
                "tracer" => settings.apply_tracer(section)?,
                "layout" => settings.apply_layout(section)?,
                "game" => settings.apply_game(section)?,
                other => return Err(format!("unknown section '{}'", other)),
            }
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read settings file {}: {}", path.display(), e))?;
        let settings = Self::from_document(&content)?;
        info!("settings loaded from {}", path.display());
        Ok(settings)
    }

    fn apply_tracer(&mut self, section: &SectionMap) -> Result<(), String> {
        for (key, values) in section {
            let value = float_value("tracer", key, values)?;
            match key.as_str() {
                "x_start" => self.x_start = value,
                "x_end" => self.x_end = value,
                "y_limit" => self.y_limit = value,
                "large_increment" => self.tracer.large_increment = value,
                "small_increment" => self.tracer.small_increment = value,
                "min_distance_squared" => self.tracer.min_distance_squared = value,
                "max_distance_squared" => self.tracer.max_distance_squared = value,
                other => return Err(format!("unknown key 'tracer.{}'", other)),
            }
        }
        Ok(())
    }

    fn apply_layout(&mut self, section: &SectionMap) -> Result<(), String> {
        for (key, values) in section {
            match key.as_str() {
                "good_dots" => self.good_dots = count_value("layout", key, values)?,
                "bad_dots" => self.bad_dots = count_value("layout", key, values)?,
                "x_min" => self.layout_x.0 = float_value("layout", key, values)?,
                "x_max" => self.layout_x.1 = float_value("layout", key, values)?,
                "y_min" => self.layout_y.0 = float_value("layout", key, values)?,
                "y_max" => self.layout_y.1 = float_value("layout", key, values)?,
                other => return Err(format!("unknown key 'layout.{}'", other)),
            }
        }
        Ok(())
    }

    fn apply_game(&mut self, section: &SectionMap) -> Result<(), String> {
        for (key, values) in section {
            match key.as_str() {
                "seed" => self.seed = count_value("game", key, values)? as u64,
                other => return Err(format!("unknown key 'game.{}'", other)),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.x_start < self.x_end) {
            return Err(format!(
                "empty tracing window [{}, {}]",
                self.x_start, self.x_end
            ));
        }
        if !(self.y_limit > 0.0) {
            return Err(format!("y_limit must be positive, got {}", self.y_limit));
        }
        let t = &self.tracer;
        if !(t.large_increment > 0.0 && t.small_increment > 0.0) {
            return Err("tracer increments must be positive".to_string());
        }
        if !(0.0 < t.min_distance_squared && t.min_distance_squared < t.max_distance_squared) {
            return Err(format!(
                "bad distance band [{}, {}]",
                t.min_distance_squared, t.max_distance_squared
            ));
        }
        if !(self.layout_x.0 < self.layout_x.1 && self.layout_y.0 < self.layout_y.1) {
            return Err(format!(
                "empty layout area {:?} x {:?}",
                self.layout_x, self.layout_y
            ));
        }
        Ok(())
    }

    pub fn tracer(&self) -> CurveTracer {
        CurveTracer::with_settings(self.x_start, self.x_end, self.y_limit, self.tracer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = GameSettings::default();
        assert_eq!(settings.good_dots, 6);
        assert_eq!(settings.bad_dots, 3);
        assert_relative_eq!(settings.tracer.large_increment, 0.1);
        assert!(settings.validate().is_ok());
        assert_eq!(GameSettings::from_document("").unwrap(), settings);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let doc = "// a short game\ntracer\n x_start: -5\n y_limit: 50.5\ngame\n seed: 7\n";
        let settings = GameSettings::from_document(doc).unwrap();
        assert_relative_eq!(settings.x_start, -5.0);
        assert_relative_eq!(settings.x_end, 10.0);
        assert_relative_eq!(settings.y_limit, 50.5);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.good_dots, 6);
    }

    #[test]
    fn test_layout_section() {
        let doc = "layout\n good_dots: 2\n bad_dots: 0\n x_min: -1\n x_max: 1.5\n";
        let settings = GameSettings::from_document(doc).unwrap();
        assert_eq!(settings.good_dots, 2);
        assert_eq!(settings.bad_dots, 0);
        assert_eq!(settings.layout_x, (-1.0, 1.5));
        assert_eq!(settings.layout_y, (-9.0, 9.0));
    }

    #[test]
    fn test_rejects_unknown_and_malformed() {
        assert!(GameSettings::from_document("physics\n g: 9.8\n").is_err());
        assert!(GameSettings::from_document("tracer\n x_begin: 1\n").is_err());
        assert!(GameSettings::from_document("tracer\n x_start: left\n").is_err());
        assert!(GameSettings::from_document("tracer\n x_start: 1, 2\n").is_err());
        assert!(GameSettings::from_document("layout\n good_dots: -1\n").is_err());
        assert!(GameSettings::from_document("layout\n good_dots: 1.5\n").is_err());
    }

    #[test]
    fn test_rejects_inconsistent_values() {
        assert!(GameSettings::from_document("tracer\n x_start: 10\n x_end: -10\n").is_err());
        assert!(GameSettings::from_document("tracer\n small_increment: 0\n").is_err());
        assert!(
            GameSettings::from_document(
                "tracer\n min_distance_squared: 0.1\n max_distance_squared: 0.01\n"
            )
            .is_err()
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "# settings").unwrap();
        writeln!(file, "game").unwrap();
        writeln!(file, " seed: 123").unwrap();
        drop(file);
        let settings = GameSettings::from_file(&path).unwrap();
        assert_eq!(settings.seed, 123);
        assert!(GameSettings::from_file(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_tracer_uses_window() {
        let doc = "tracer\n x_start: -2\n x_end: 3\n";
        let tracer = GameSettings::from_document(doc).unwrap().tracer();
        assert_relative_eq!(tracer.x_start, -2.0);
        assert_relative_eq!(tracer.x_end, 3.0);
    }
}
