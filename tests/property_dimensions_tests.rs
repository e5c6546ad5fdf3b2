use proptest::prelude::*;
use viz_rs::core::{Dimensions, Margin, ResponsiveDimensions};

fn margin_strategy() -> impl Strategy<Value = Margin> {
    (0.0f64..200.0, 0.0f64..200.0, 0.0f64..200.0, 0.0f64..200.0)
        .prop_map(|(top, right, bottom, left)| Margin::new(top, right, bottom, left))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn bounded_size_never_goes_negative(
        width in 0.0f64..3_000.0,
        height in 0.0f64..3_000.0,
        margin in margin_strategy(),
    ) {
        let dims = Dimensions::new(width, height, margin).expect("valid dimensions");

        prop_assert!(dims.bounded_width >= 0.0);
        prop_assert!(dims.bounded_height >= 0.0);
        prop_assert!(dims.bounded_width <= width);
        prop_assert!(dims.bounded_height <= height);
        if width >= margin.horizontal() {
            prop_assert_eq!(dims.bounded_width, width - margin.horizontal());
        }
        let (cx, cy) = dims.bounded_center();
        prop_assert!(dims.bounded_radius() <= cx.max(cy) + f64::EPSILON);
    }

    #[test]
    fn requested_sizes_win_over_observations(
        requested in prop::option::of(1.0f64..2_000.0),
        observed_width in 0.0f64..2_000.0,
        observed_height in 0.0f64..2_000.0,
        margin in margin_strategy(),
    ) {
        let mut responsive = ResponsiveDimensions::new(requested, Some(480.0), margin);
        responsive.observe(observed_width, observed_height).expect("valid observation");
        let dims = responsive.current().expect("dimensions");

        prop_assert_eq!(dims.width, requested.unwrap_or(observed_width));
        prop_assert_eq!(dims.height, 480.0);
        prop_assert!(responsive.observe(observed_width, observed_height).expect("same size").is_none());
    }

    #[test]
    fn invalid_sizes_are_rejected(
        width in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), -1_000.0f64..-0.001],
    ) {
        prop_assert!(Dimensions::new(width, 100.0, Margin::default()).is_err());
        let mut responsive = ResponsiveDimensions::new(None, None, Margin::default());
        prop_assert!(responsive.observe(width, 100.0).is_err());
    }
}
