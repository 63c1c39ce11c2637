//! Engine context threaded through every alert handler and service step.
//!
//! `EngineContext` is the single owned "blackboard": configuration, this
//! tick's time and inputs, the sensor bank, alert bookkeeping and the
//! random source. Nothing in the engine lives outside it.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::alert::fire::FireDetector;
use crate::alert::wildlife::WildlifeMonitor;
use crate::alert::AlertOutbox;
use crate::config::StationConfig;
use crate::drivers::button::InputFrame;
use crate::sensors::{ChannelId, SensorBank};

/// Hour used when the wall clock has not been set.
pub const FALLBACK_HOUR: u8 = 12;

pub struct EngineContext {
    // -- Timing --
    /// Milliseconds since start-up at the beginning of this tick.
    pub now_ms: u32,
    /// Wall-clock hour for the temperature model.
    pub hour: u8,
    /// Monotonic total tick count.
    pub tick_count: u64,

    // -- Configuration --
    pub config: StationConfig,

    // -- Inputs --
    /// Debounced edges for this tick.
    pub input: InputFrame,

    // -- Domain state --
    pub sensors: SensorBank,
    pub fire: FireDetector,
    pub wildlife: WildlifeMonitor,
    /// Channel shown on the display, if any channel is enabled.
    pub selected: Option<ChannelId>,

    // -- Outputs --
    /// Written by alert handlers, drained by the service each tick.
    pub alert_events: AlertOutbox,

    pub rng: ChaCha8Rng,
}

impl EngineContext {
    pub fn new(config: StationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => {
                debug!("RNG seeded with {seed}");
                ChaCha8Rng::seed_from_u64(seed)
            }
            None => ChaCha8Rng::from_entropy(),
        };
        let selected = SensorBank::ensure_enabled(None, &config.features);
        Self {
            now_ms: 0,
            hour: FALLBACK_HOUR,
            tick_count: 0,
            config,
            input: InputFrame::default(),
            sensors: SensorBank::new(),
            fire: FireDetector::new(0),
            wildlife: WildlifeMonitor::new(),
            selected,
            alert_events: AlertOutbox::new(),
            rng,
        }
    }
}
