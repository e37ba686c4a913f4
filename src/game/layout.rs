/// Random placement of dots on the field.
use crate::game::dot::{DOT_RADIUS, Dot, DotKind};
use crate::game::settings::GameSettings;
use log::{debug, warn};
use rand::Rng;

/// attempts per dot before the layout gives up on it
const MAX_ATTEMPTS_PER_DOT: usize = 1000;

/// Places `settings.good_dots` good and `settings.bad_dots` bad dots uniformly inside the
/// layout area. Centres are kept at least two radii apart, so dots never overlap. When
/// the area is too crowded a dot that cannot be placed is skipped with a warning.
pub fn generate_dots<R: Rng>(rng: &mut R, settings: &GameSettings) -> Vec<Dot> {
    let kinds = std::iter::repeat_n(DotKind::Good, settings.good_dots)
        .chain(std::iter::repeat_n(DotKind::Bad, settings.bad_dots));
    let min_distance_squared = (2.0 * DOT_RADIUS).powi(2);
    let (x_min, x_max) = settings.layout_x;
    let (y_min, y_max) = settings.layout_y;
    let mut dots: Vec<Dot> = Vec::with_capacity(settings.good_dots + settings.bad_dots);
    for kind in kinds {
        let placed = (0..MAX_ATTEMPTS_PER_DOT).find_map(|_| {
            let candidate = Dot::new(
                rng.random_range(x_min..=x_max),
                rng.random_range(y_min..=y_max),
                kind,
            );
            let free = dots.iter().all(|other| {
                other.center().distance_squared(&candidate.center()) >= min_distance_squared
            });
            free.then_some(candidate)
        });
        match placed {
            Some(dot) => dots.push(dot),
            None => warn!("no room left for a {} dot", kind),
        }
    }
    debug!("{} dots placed", dots.len());
    dots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_counts_and_area() {
        let settings = GameSettings::default();
        let dots = generate_dots(&mut StdRng::seed_from_u64(1), &settings);
        assert_eq!(dots.len(), 9);
        assert_eq!(dots.iter().filter(|d| d.kind == DotKind::Good).count(), 6);
        assert_eq!(dots.iter().filter(|d| d.kind == DotKind::Bad).count(), 3);
        for d in &dots {
            assert!((-9.0..=9.0).contains(&d.x) && (-9.0..=9.0).contains(&d.y));
        }
    }

    #[test]
    fn test_dots_do_not_overlap() {
        let settings = GameSettings {
            good_dots: 30,
            bad_dots: 10,
            ..GameSettings::default()
        };
        let dots = generate_dots(&mut StdRng::seed_from_u64(7), &settings);
        assert_eq!(dots.len(), 40);
        for (i, a) in dots.iter().enumerate() {
            for b in &dots[i + 1..] {
                assert!(a.center().distance_squared(&b.center()) >= 0.25);
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let settings = GameSettings::default();
        let a = generate_dots(&mut StdRng::seed_from_u64(3), &settings);
        let b = generate_dots(&mut StdRng::seed_from_u64(3), &settings);
        assert_eq!(a, b);
    }

    #[test]
    fn test_crowded_area_skips_dots() {
        let settings = GameSettings {
            good_dots: 5,
            bad_dots: 0,
            layout_x: (0.0, 0.1),
            layout_y: (0.0, 0.1),
            ..GameSettings::default()
        };
        let dots = generate_dots(&mut StdRng::seed_from_u64(0), &settings);
        assert_eq!(dots.len(), 1);
    }
}
