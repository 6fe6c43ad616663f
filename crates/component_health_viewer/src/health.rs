use crate::catalog::{AssetVariant, VARIANT_COUNT};

pub(super) const MIN_HEALTH: u8 = 0;
pub(super) const MAX_HEALTH: u8 = 100;

/// Inclusive lower bound of each bucket, aligned with `HEALTH_THRESHOLDS`.
/// Widths are 11, 30, 20, 30 and 10 health points.
const BUCKET_LOWER_BOUNDS: [u8; VARIANT_COUNT] = [90, 60, 40, 10, 0];

/// Out-of-range input is clamped to the nearest bound rather than rejected.
pub(super) fn clamp_health(value: i32) -> u8 {
    value.clamp(i32::from(MIN_HEALTH), i32::from(MAX_HEALTH)) as u8
}

pub(super) fn bucket_index(health: i32) -> usize {
    let health = clamp_health(health);
    BUCKET_LOWER_BOUNDS
        .iter()
        .position(|lower_bound| health >= *lower_bound)
        .unwrap_or(VARIANT_COUNT - 1)
}

pub(super) fn bucket_lower_bound(index: usize) -> u8 {
    BUCKET_LOWER_BOUNDS[index.min(VARIANT_COUNT - 1)]
}

pub(super) fn select_variant(health: i32, variants: &[AssetVariant; VARIANT_COUNT]) -> &AssetVariant {
    &variants[bucket_index(health)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{variant_file_path, HEALTH_THRESHOLDS};

    fn sample_variants() -> [AssetVariant; VARIANT_COUNT] {
        HEALTH_THRESHOLDS.map(|health_threshold| AssetVariant {
            health_threshold,
            file_path: variant_file_path("comp1", health_threshold),
        })
    }

    fn selected_threshold(health: i32) -> u8 {
        select_variant(health, &sample_variants()).health_threshold
    }

    #[test]
    fn bucket_boundaries_match_threshold_table() {
        let cases = [
            (100, 100),
            (90, 100),
            (89, 75),
            (60, 75),
            (59, 50),
            (40, 50),
            (39, 25),
            (10, 25),
            (9, 0),
            (0, 0),
        ];
        for (health, expected) in cases {
            assert_eq!(selected_threshold(health), expected, "health {health}");
        }
    }

    #[test]
    fn every_health_value_maps_into_its_range() {
        for health in 0..=100 {
            let expected = match health {
                90..=100 => 100,
                60..=89 => 75,
                40..=59 => 50,
                10..=39 => 25,
                _ => 0,
            };
            assert_eq!(selected_threshold(health), expected, "health {health}");
        }
    }

    #[test]
    fn bucket_widths_are_asymmetric() {
        let mut widths = [0usize; VARIANT_COUNT];
        for health in 0..=100 {
            widths[bucket_index(health)] += 1;
        }
        assert_eq!(widths, [11, 30, 20, 30, 10]);
    }

    #[test]
    fn selection_is_monotonic_in_health() {
        let mut previous = selected_threshold(0);
        for health in 1..=100 {
            let current = selected_threshold(health);
            assert!(current >= previous, "health {health}");
            previous = current;
        }
    }

    #[test]
    fn out_of_range_health_is_clamped() {
        assert_eq!(clamp_health(-20), 0);
        assert_eq!(clamp_health(250), 100);
        assert_eq!(clamp_health(42), 42);
        assert_eq!(selected_threshold(-1), 0);
        assert_eq!(selected_threshold(i32::MAX), 100);
        assert_eq!(selected_threshold(i32::MIN), 0);
    }

    #[test]
    fn selected_variant_carries_matching_path() {
        let variants = sample_variants();
        assert_eq!(
            select_variant(45, &variants).file_path,
            "/models/comp1/comp1_50.glb"
        );
        assert_eq!(
            select_variant(5, &variants).file_path,
            "/models/comp1/comp1_0.glb"
        );
    }
}
