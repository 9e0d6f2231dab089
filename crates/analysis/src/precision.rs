//! Display precision policy.
//!
//! Every value this crate hands to the presentation side is rounded through
//! one helper so the rule lives in exactly one place.

/// Rounds to 3 decimal digits, half away from zero.
///
/// `1.2345` rounds to `1.235` and `-1.2345` to `-1.235`, matching standard
/// decimal rounding of the displayed figures.
pub fn round_3dp(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::round_3dp;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_3dp(1.2345), 1.235);
        assert_eq!(round_3dp(-1.2345), -1.235);
        assert_eq!(round_3dp(1.23456), 1.235);
        assert_eq!(round_3dp(1.2344), 1.234);
    }

    #[test]
    fn leaves_short_values_alone() {
        assert_eq!(round_3dp(1.0), 1.0);
        assert_eq!(round_3dp(0.0), 0.0);
        assert_eq!(round_3dp(-2.5), -2.5);
    }
}
