//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them (serial log, test recorder).

use crate::alert::AlertState;
use crate::config::FeatureToggles;
use crate::sensors::ChannelId;

/// Structured events emitted by the monitoring engine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started with these modules enabled.
    Started(FeatureToggles),

    /// Periodic reading of one enabled channel.
    Reading(Reading),

    /// Enabled channels currently outside their anomaly band. Empty = none.
    AnomalySummary(heapless::Vec<ChannelId, { ChannelId::COUNT }>),

    /// The alert mode changed.
    StateChanged { from: AlertState, to: AlertState },

    FireTriggered { at_ms: u32, forced: bool },

    FireCancelled,

    WildlifeDetected {
        label: &'static str,
        evidence: &'static str,
    },

    WildlifeCancelled { label: &'static str },

    WildlifeExpired { label: &'static str },

    /// The operator moved the display to another channel.
    ChannelSelected(ChannelId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub channel: ChannelId,
    pub value: f32,
    pub unit: &'static str,
    pub moving_average: f32,
    pub anomalous: bool,
}
