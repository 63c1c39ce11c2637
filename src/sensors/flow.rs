//! Simulated stream water flow (L/min).
//!
//! Flow only exists while it is raining: any positive rainfall reading
//! produces a uniform draw in [0, 20) L/min, otherwise the base is zero.

use rand::Rng;

use super::Calibration;

pub const CALIBRATION: Calibration = Calibration {
    unit: "L/min",
    min: 0.0,
    max: 30.0,
    anomaly_min: 0.0,
    anomaly_max: 25.0,
    variation: 1.0,
    initial: 0.0,
};

/// Upper bound (exclusive) of the flow draw while raining.
const RAIN_FLOW_MAX: f32 = 20.0;

pub fn base<R: Rng + ?Sized>(rainfall_now: f32, rng: &mut R) -> f32 {
    if rainfall_now > 0.0 {
        rng.gen_range(0.0..RAIN_FLOW_MAX)
    } else {
        0.0
    }
}
