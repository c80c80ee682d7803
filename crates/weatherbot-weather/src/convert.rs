//! Temperature unit conversion.

/// Whole-degree offset used by [`kelvin_to_celsius`] (not 273.15): replies
/// render 283.15 K as 10.15 °C.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Exact Kelvin/Celsius offset. Not used for replies.
pub const EXACT_KELVIN_OFFSET: f64 = 273.15;

/// Convert an absolute temperature in Kelvin to degrees Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freezing_point() {
        assert_eq!(kelvin_to_celsius(273.0), 0.0);
    }

    #[test]
    fn test_boiling_point() {
        assert_eq!(kelvin_to_celsius(373.0), 100.0);
    }

    #[test]
    fn test_reply_offset_is_whole_degree() {
        assert!((kelvin_to_celsius(EXACT_KELVIN_OFFSET) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_is_pure_offset() {
        assert_eq!(kelvin_to_celsius(0.0), -273.0);
        assert_eq!(kelvin_to_celsius(-10.0), -283.0);
        assert!((kelvin_to_celsius(283.15) - 10.15).abs() < 1e-9);
    }
}
