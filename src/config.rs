//! Station configuration parameters
//!
//! All tunable parameters for the monitoring station, plus the feature
//! toggles chosen in the start-up menu. The core treats the whole struct
//! as read-only once the main loop is running.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// A module that can be switched on or off before the main loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Feature {
    Temperature = 0,
    WaterFlow = 1,
    Rainfall = 2,
    Fire = 3,
    Wildlife = 4,
}

impl Feature {
    pub const COUNT: usize = 5;

    /// Menu order.
    pub const ALL: [Feature; Feature::COUNT] = [
        Self::Temperature,
        Self::WaterFlow,
        Self::Rainfall,
        Self::Fire,
        Self::Wildlife,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::WaterFlow => "Water flow",
            Self::Rainfall => "Rainfall",
            Self::Fire => "Fire",
            Self::Wildlife => "Wildlife",
        }
    }

    /// True for the three simulated sensor channels.
    pub const fn is_channel(self) -> bool {
        matches!(self, Self::Temperature | Self::WaterFlow | Self::Rainfall)
    }
}

type FeatureList = heapless::Vec<Feature, { Feature::COUNT }>;

/// Per-feature enablement, keyed by [`Feature`].
///
/// Serialised as the list of enabled features, e.g. `["temperature", "fire"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "FeatureList", into = "FeatureList")]
pub struct FeatureToggles {
    enabled: [bool; Feature::COUNT],
}

impl FeatureToggles {
    /// Everything off.
    pub const fn none() -> Self {
        Self {
            enabled: [false; Feature::COUNT],
        }
    }

    /// Everything on.
    pub const fn all() -> Self {
        Self {
            enabled: [true; Feature::COUNT],
        }
    }

    /// Only the listed features on.
    pub fn only(features: &[Feature]) -> Self {
        let mut toggles = Self::none();
        for &f in features {
            toggles.set(f, true);
        }
        toggles
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled[feature as usize]
    }

    pub fn set(&mut self, feature: Feature, on: bool) {
        self.enabled[feature as usize] = on;
    }

    /// Flip a feature and return its new state.
    pub fn toggle(&mut self, feature: Feature) -> bool {
        let slot = &mut self.enabled[feature as usize];
        *slot = !*slot;
        *slot
    }

    /// `(feature, enabled)` pairs in menu order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        Feature::ALL.iter().map(|&f| (f, self.is_enabled(f)))
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.iter().filter(|&&on| on).count()
    }

    /// Number of enabled sensor channels.
    pub fn channel_count(&self) -> usize {
        self.iter().filter(|(f, on)| *on && f.is_channel()).count()
    }

    /// Fire is enabled and nothing else is.
    pub fn fire_isolated(&self) -> bool {
        self.is_enabled(Feature::Fire) && self.enabled_count() == 1
    }
}

impl From<FeatureList> for FeatureToggles {
    fn from(list: FeatureList) -> Self {
        Self::only(&list)
    }
}

impl From<FeatureToggles> for FeatureList {
    fn from(toggles: FeatureToggles) -> Self {
        toggles
            .iter()
            .filter_map(|(f, on)| on.then_some(f))
            .collect()
    }
}

/// What the LED matrix shows outside a fire alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientStyle {
    /// Looping flame glyph.
    #[default]
    Flame,
    /// One bar per sensor channel, height tracking the reading.
    LevelBars,
}

// ---------------------------------------------------------------------------
// StationConfig
// ---------------------------------------------------------------------------

/// Core station configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    // --- Features ---
    /// Modules enabled for this run.
    pub features: FeatureToggles,

    // --- Timing ---
    /// Main loop cadence (milliseconds)
    pub tick_interval_ms: u32,
    /// Raw input must hold this long before the debounced value follows
    pub debounce_ms: u32,
    /// Minimum gap between two channel-cycling or menu actions
    pub cycle_repeat_ms: u32,
    /// Ambient animation frame period
    pub animation_frame_ms: u32,
    /// Reading / anomaly report period
    pub telemetry_interval_ms: u32,

    // --- Fire ---
    /// Per-tick trigger probability with other modules enabled
    pub fire_probability: f64,
    /// Per-tick trigger probability when Fire is the only module
    pub fire_isolated_probability: f64,
    /// Forced trigger after this long in isolated mode
    pub fire_isolated_force_ms: u32,

    // --- Wildlife ---
    /// Per-tick detection probability
    pub wildlife_probability: f64,
    /// Auto-expiry of a wildlife alert
    pub wildlife_alert_ms: u32,

    // --- Sensors ---
    /// Per-tick chance of a rain burst
    pub rain_probability: f64,

    // --- Start-up / outputs ---
    /// LED matrix pattern outside a fire alert
    pub ambient_style: AmbientStyle,
    /// All-blue LED self-test duration at start-up; 0 skips it
    pub led_self_test_ms: u32,
    /// How long each start-up splash screen stays up
    pub splash_hold_ms: u32,

    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            features: FeatureToggles::all(),

            // Timing
            tick_interval_ms: 100, // 10 Hz
            debounce_ms: 50,
            cycle_repeat_ms: 200,
            animation_frame_ms: 200,
            telemetry_interval_ms: 100, // every tick

            // Fire
            fire_probability: 0.01,
            fire_isolated_probability: 0.20,
            fire_isolated_force_ms: 5000,

            // Wildlife
            wildlife_probability: 0.05,
            wildlife_alert_ms: 10_000,

            // Sensors
            rain_probability: 0.30,

            // Start-up / outputs
            ambient_style: AmbientStyle::Flame,
            led_self_test_ms: 1000,
            splash_hold_ms: 2000,

            seed: None,
        }
    }
}

impl StationConfig {
    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), &'static str> {
        let probabilities = [
            (self.fire_probability, "fire_probability must be within [0, 1]"),
            (
                self.fire_isolated_probability,
                "fire_isolated_probability must be within [0, 1]",
            ),
            (self.wildlife_probability, "wildlife_probability must be within [0, 1]"),
            (self.rain_probability, "rain_probability must be within [0, 1]"),
        ];
        for (p, msg) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(msg);
            }
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be non-zero");
        }
        if self.animation_frame_ms == 0 {
            return Err("animation_frame_ms must be non-zero");
        }
        if self.wildlife_alert_ms == 0 {
            return Err("wildlife_alert_ms must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = StationConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.debounce_ms < c.cycle_repeat_ms);
        assert!(c.fire_isolated_probability > c.fire_probability);
        assert_eq!(c.features.enabled_count(), Feature::COUNT);
    }

    #[test]
    fn serde_roundtrip() {
        let mut c = StationConfig::default();
        c.features = FeatureToggles::only(&[Feature::Rainfall, Feature::Fire]);
        c.seed = Some(7);
        let json = serde_json::to_string(&c).unwrap();
        let c2: StationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn ambient_style_is_snake_case() {
        let c: StationConfig = serde_json::from_str(r#"{"ambient_style":"level_bars"}"#).unwrap();
        assert_eq!(c.ambient_style, AmbientStyle::LevelBars);
        assert_eq!(StationConfig::default().ambient_style, AmbientStyle::Flame);
    }

    #[test]
    fn toggles_serialise_as_feature_list() {
        let t = FeatureToggles::only(&[Feature::Temperature, Feature::Wildlife]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"["temperature","wildlife"]"#);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: StationConfig = serde_json::from_str(r#"{"features":["fire"]}"#).unwrap();
        assert!(c.features.fire_isolated());
        assert_eq!(c.wildlife_alert_ms, 10_000);
    }

    #[test]
    fn out_of_range_probability_rejected() {
        let c = StationConfig {
            wildlife_probability: 1.5,
            ..StationConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn fire_isolated_only_when_alone() {
        assert!(FeatureToggles::only(&[Feature::Fire]).fire_isolated());
        assert!(!FeatureToggles::only(&[Feature::Fire, Feature::Rainfall]).fire_isolated());
        assert!(!FeatureToggles::none().fire_isolated());
    }

    #[test]
    fn toggle_flips_and_counts() {
        let mut t = FeatureToggles::none();
        assert!(t.toggle(Feature::WaterFlow));
        assert_eq!(t.channel_count(), 1);
        assert!(!t.toggle(Feature::WaterFlow));
        assert_eq!(t.enabled_count(), 0);
    }
}
