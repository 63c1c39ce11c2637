//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per application event to
//! the `log` facade (serial console on the board, tracing subscriber in
//! the host simulation).

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Every module label plus a separator is 46 bytes.
const MODULE_LIST_LEN: usize = 64;
/// Every channel name plus a separator is 31 bytes.
const CHANNEL_LIST_LEN: usize = 48;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(features) => {
                let mut names = heapless::String::<MODULE_LIST_LEN>::new();
                for (feature, on) in features.iter() {
                    if on {
                        let fits = write!(names, "{} ", feature.label()).is_ok();
                        debug_assert!(fits, "module list overflow");
                    }
                }
                info!("START | modules=[{}]", names.trim_end());
            }
            AppEvent::Reading(r) => {
                info!(
                    "READ  | {}: {:.1} {} (avg {:.1}){}",
                    r.channel.name(),
                    r.value,
                    r.unit,
                    r.moving_average,
                    if r.anomalous { " ANOMALY" } else { "" },
                );
            }
            AppEvent::AnomalySummary(channels) => {
                if channels.is_empty() {
                    info!("ANOM  | none");
                } else {
                    let mut names = heapless::String::<CHANNEL_LIST_LEN>::new();
                    for ch in channels {
                        let fits = write!(names, "{} ", ch.name()).is_ok();
                        debug_assert!(fits, "channel list overflow");
                    }
                    warn!("ANOM  | {}", names.trim_end());
                }
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::FireTriggered { at_ms, forced } => {
                warn!(
                    "FIRE  | detected at {} ms{}",
                    at_ms,
                    if *forced { " (isolated timeout)" } else { "" }
                );
            }
            AppEvent::FireCancelled => {
                info!("FIRE  | cancelled by operator");
            }
            AppEvent::WildlifeDetected { label, evidence } => {
                warn!("WILD  | {} detected, evidence: {}", label, evidence);
            }
            AppEvent::WildlifeCancelled { label } => {
                info!("WILD  | {} alert cancelled by operator", label);
            }
            AppEvent::WildlifeExpired { label } => {
                info!("WILD  | {} alert expired", label);
            }
            AppEvent::ChannelSelected(ch) => {
                info!("VIEW  | {}", ch.name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureToggles;
    use crate::sensors::ChannelId;

    #[test]
    fn longest_lists_fit() {
        let mut sink = LogEventSink::new();
        sink.emit(&AppEvent::Started(FeatureToggles::all()));
        let all: heapless::Vec<ChannelId, { ChannelId::COUNT }> = ChannelId::ALL.into_iter().collect();
        sink.emit(&AppEvent::AnomalySummary(all));
    }
}
