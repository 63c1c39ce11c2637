//! Simulated rainfall intensity (mm/h).
//!
//! Bursty model: each tick either a burst (uniform in [0, max)) or nothing.

use rand::Rng;

use super::Calibration;

pub const CALIBRATION: Calibration = Calibration {
    unit: "mm/h",
    min: 0.0,
    max: 100.0,
    anomaly_min: 0.0,
    anomaly_max: 80.0,
    variation: 5.0,
    initial: 0.0,
};

pub fn base<R: Rng + ?Sized>(cal: &Calibration, burst_probability: f64, rng: &mut R) -> f32 {
    if rng.gen_bool(burst_probability) {
        rng.gen_range(0.0..cal.max)
    } else {
        0.0
    }
}
