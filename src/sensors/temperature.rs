//! Simulated air temperature (°C).
//!
//! Follows a diurnal sine around the range midpoint with ±5 °C amplitude.
//! The curve crosses the midpoint rising at 14:00, peaks at 20:00 and
//! bottoms out at 08:00. Wall-clock hour comes from the clock port.

use core::f32::consts::PI;

use super::Calibration;

pub const CALIBRATION: Calibration = Calibration {
    unit: "C",
    min: 15.0,
    max: 35.0,
    anomaly_min: 10.0,
    anomaly_max: 40.0,
    variation: 0.5,
    initial: 25.0,
};

const DIURNAL_AMPLITUDE_C: f32 = 5.0;
/// Hour at which the curve crosses the midpoint on the way up.
const RISING_HOUR: f32 = 14.0;

/// Noise-free temperature for the given hour of day.
pub fn base(cal: &Calibration, hour_of_day: u8) -> f32 {
    let phase = (f32::from(hour_of_day) - RISING_HOUR) * PI / 12.0;
    cal.midpoint() + DIURNAL_AMPLITUDE_C * phase.sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_at_rising_hour() {
        assert!((base(&CALIBRATION, 14) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn peaks_at_twenty_and_bottoms_at_eight() {
        let hottest = (0..24).max_by(|&a, &b| base(&CALIBRATION, a).total_cmp(&base(&CALIBRATION, b)));
        let coldest = (0..24).min_by(|&a, &b| base(&CALIBRATION, a).total_cmp(&base(&CALIBRATION, b)));
        assert_eq!(hottest, Some(20));
        assert_eq!(coldest, Some(8));
    }

    #[test]
    fn swings_by_amplitude() {
        assert!((base(&CALIBRATION, 20) - 30.0).abs() < 1e-3);
        assert!((base(&CALIBRATION, 8) - 20.0).abs() < 1e-3);
    }
}
