//! Sensor subsystem: simulated channels and the aggregating [`SensorBank`].
//!
//! Each channel owns its calibration, current value and a 10-deep history.
//! The bank advances every enabled channel once per tick and answers the
//! channel-cycling queries the input router needs.

pub mod flow;
pub mod rainfall;
pub mod temperature;

use heapless::HistoryBuffer;
use rand::Rng;

use crate::config::{Feature, FeatureToggles};

/// Number of samples kept for the moving average.
pub const HISTORY_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Channel identity
// ---------------------------------------------------------------------------

/// The three simulated quantities, in advance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelId {
    Temperature = 0,
    WaterFlow = 1,
    Rainfall = 2,
}

impl ChannelId {
    pub const COUNT: usize = 3;

    pub const ALL: [ChannelId; ChannelId::COUNT] =
        [Self::Temperature, Self::WaterFlow, Self::Rainfall];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(idx: usize) -> Self {
        match idx % Self::COUNT {
            0 => Self::Temperature,
            1 => Self::WaterFlow,
            _ => Self::Rainfall,
        }
    }

    /// The feature toggle that enables this channel.
    pub const fn feature(self) -> Feature {
        match self {
            Self::Temperature => Feature::Temperature,
            Self::WaterFlow => Feature::WaterFlow,
            Self::Rainfall => Feature::Rainfall,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::WaterFlow => "Water flow",
            Self::Rainfall => "Rainfall",
        }
    }

    pub const fn calibration(self) -> Calibration {
        match self {
            Self::Temperature => temperature::CALIBRATION,
            Self::WaterFlow => flow::CALIBRATION,
            Self::Rainfall => rainfall::CALIBRATION,
        }
    }
}

/// Fixed per-channel constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub unit: &'static str,
    /// Valid range; every value is clamped into it.
    pub min: f32,
    pub max: f32,
    /// Readings outside this band are anomalous. May exceed the valid range.
    pub anomaly_min: f32,
    pub anomaly_max: f32,
    /// Half-width of the additive uniform noise.
    pub variation: f32,
    pub initial: f32,
}

impl Calibration {
    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) / 2.0
    }
}

// ---------------------------------------------------------------------------
// SensorChannel
// ---------------------------------------------------------------------------

pub struct SensorChannel {
    id: ChannelId,
    cal: Calibration,
    value: f32,
    history: HistoryBuffer<f32, HISTORY_LEN>,
}

impl SensorChannel {
    pub fn new(id: ChannelId) -> Self {
        let cal = id.calibration();
        Self {
            id,
            cal,
            value: cal.initial,
            history: HistoryBuffer::new_with(cal.initial),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn calibration(&self) -> &Calibration {
        &self.cal
    }

    pub fn unit(&self) -> &'static str {
        self.cal.unit
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// History oldest-first. Always exactly [`HISTORY_LEN`] entries.
    pub fn history(&self) -> impl Iterator<Item = f32> + '_ {
        self.history.oldest_ordered().copied()
    }

    /// Arithmetic mean of the history.
    pub fn moving_average(&self) -> f32 {
        let sum: f32 = self.history.as_slice().iter().sum();
        sum / HISTORY_LEN as f32
    }

    /// Instantaneous check against the anomaly band.
    pub fn is_anomalous(&self) -> bool {
        self.value < self.cal.anomaly_min || self.value > self.cal.anomaly_max
    }

    /// Position of the current value within the valid range, rounded to
    /// `0..=steps`.
    pub fn level(&self, steps: u8) -> u8 {
        let span = self.cal.max - self.cal.min;
        let scaled = (self.value - self.cal.min) / span * f32::from(steps) + 0.5;
        scaled.clamp(0.0, f32::from(steps)) as u8
    }

    /// Clamp `raw` into the valid range, make it current and push it into
    /// the history (evicting the oldest sample). Returns the stored value.
    pub fn record(&mut self, raw: f32) -> f32 {
        let value = raw.clamp(self.cal.min, self.cal.max);
        self.value = value;
        self.history.write(value);
        value
    }
}

// ---------------------------------------------------------------------------
// SensorBank
// ---------------------------------------------------------------------------

/// Direction for channel cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// The static set of three channels.
pub struct SensorBank {
    channels: [SensorChannel; ChannelId::COUNT],
}

impl Default for SensorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBank {
    pub fn new() -> Self {
        Self {
            channels: ChannelId::ALL.map(SensorChannel::new),
        }
    }

    pub fn channel(&self, id: ChannelId) -> &SensorChannel {
        &self.channels[id.index()]
    }

    pub fn channels(&self) -> impl Iterator<Item = &SensorChannel> {
        self.channels.iter()
    }

    /// Generate one new reading for `id`: channel base signal plus uniform
    /// noise, clamped. Returns the recorded value.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        id: ChannelId,
        hour_of_day: u8,
        rain_probability: f64,
        rng: &mut R,
    ) -> f32 {
        let cal = self.channels[id.index()].cal;
        let base = match id {
            ChannelId::Temperature => temperature::base(&cal, hour_of_day),
            ChannelId::WaterFlow => {
                flow::base(self.channel(ChannelId::Rainfall).value(), rng)
            }
            ChannelId::Rainfall => rainfall::base(&cal, rain_probability, rng),
        };
        let noise = if cal.variation > 0.0 {
            rng.gen_range(-cal.variation..=cal.variation)
        } else {
            0.0
        };
        self.channels[id.index()].record(base + noise)
    }

    /// Advance every enabled channel in fixed order.
    pub fn advance_enabled<R: Rng + ?Sized>(
        &mut self,
        toggles: &FeatureToggles,
        hour_of_day: u8,
        rain_probability: f64,
        rng: &mut R,
    ) {
        for id in ChannelId::ALL {
            if toggles.is_enabled(id.feature()) {
                self.advance(id, hour_of_day, rain_probability, rng);
            }
        }
    }

    /// Enabled channels whose current value is anomalous.
    pub fn anomalies(&self, toggles: &FeatureToggles) -> heapless::Vec<ChannelId, { ChannelId::COUNT }> {
        self.channels
            .iter()
            .filter(|c| toggles.is_enabled(c.id.feature()) && c.is_anomalous())
            .map(|c| c.id)
            .collect()
    }

    /// Step from `from` to the next enabled channel in `direction`,
    /// skipping disabled ones. `None` when no channel is enabled.
    pub fn cycle(
        from: Option<ChannelId>,
        direction: CycleDirection,
        toggles: &FeatureToggles,
    ) -> Option<ChannelId> {
        if toggles.channel_count() == 0 {
            return None;
        }
        let n = ChannelId::COUNT;
        let start = match (from, direction) {
            (Some(id), _) => id.index(),
            (None, CycleDirection::Next) => n - 1,
            (None, CycleDirection::Previous) => 0,
        };
        (1..=n)
            .map(|step| match direction {
                CycleDirection::Next => ChannelId::from_index(start + step),
                CycleDirection::Previous => ChannelId::from_index(start + n - step),
            })
            .find(|id| toggles.is_enabled(id.feature()))
    }

    /// Keep `current` if it is still enabled, otherwise move forward.
    pub fn ensure_enabled(current: Option<ChannelId>, toggles: &FeatureToggles) -> Option<ChannelId> {
        match current {
            Some(id) if toggles.is_enabled(id.feature()) => Some(id),
            other => Self::cycle(other, CycleDirection::Next, toggles),
        }
    }
}
