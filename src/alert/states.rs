//! Alert state handlers and table builder.
//!
//! ```text
//!          [wildlife roll]            [fire roll / forced]
//!  WILDLIFE ◀────────────── NORMAL ──────────────────▶ FIRE
//!     │  ▲                    ▲  ▲                       │
//!     │  └─[re-roll]          │  └───────[button B]──────┘
//!     └──[any button | expiry]┘
//! ```
//!
//! Per-tick evaluation order inside `Normal`: wildlife detection first,
//! then fire detection. A fire in the same tick wins and the wildlife
//! detection is dropped. Inside `WildlifeActive`: manual cancel, then
//! re-detection, then expiry, so a press in the expiry tick wins.

use log::{info, warn};

use super::{AlertEvent, AlertState, StateDescriptor};
use crate::app::context::EngineContext;
use crate::config::Feature;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table() -> [StateDescriptor; AlertState::COUNT] {
    [
        StateDescriptor {
            id: AlertState::Normal,
            name: "Normal",
            on_enter: None,
            on_exit: None,
            on_update: normal_update,
        },
        StateDescriptor {
            id: AlertState::FireActive,
            name: "FireActive",
            on_enter: Some(fire_enter),
            on_exit: Some(fire_exit),
            on_update: fire_update,
        },
        StateDescriptor {
            id: AlertState::WildlifeActive,
            name: "WildlifeActive",
            on_enter: Some(wildlife_enter),
            on_exit: Some(wildlife_exit),
            on_update: wildlife_update,
        },
    ]
}

fn push(ctx: &mut EngineContext, event: AlertEvent) {
    if ctx.alert_events.push(event).is_err() {
        warn!("Alert outbox full, dropping {event:?}");
    }
}

/// Roll for a wildlife detection. Returns true on a hit.
fn roll_wildlife(ctx: &mut EngineContext) -> bool {
    if !ctx.config.features.is_enabled(Feature::Wildlife) {
        return false;
    }
    let p = ctx.config.wildlife_probability;
    match ctx.wildlife.roll(ctx.now_ms, p, &mut ctx.rng) {
        Some(record) => {
            push(ctx, AlertEvent::WildlifeDetected { record });
            true
        }
        None => false,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL
// ═══════════════════════════════════════════════════════════════════════════

fn normal_update(ctx: &mut EngineContext) -> Option<AlertState> {
    let wildlife_hit = roll_wildlife(ctx);

    if ctx.config.features.is_enabled(Feature::Fire) {
        let isolated = ctx.config.features.fire_isolated();
        if let Some(trigger) = ctx.fire.check(ctx.now_ms, isolated, &ctx.config, &mut ctx.rng) {
            if wildlife_hit {
                // Fire outranks a detection from the same tick.
                ctx.alert_events
                    .retain(|e| !matches!(e, AlertEvent::WildlifeDetected { .. }));
                if let Some(rec) = ctx.wildlife.clear_current() {
                    info!("WILDLIFE: '{}' superseded by fire", rec.label);
                }
            }
            push(ctx, AlertEvent::FireTriggered { forced: trigger.forced });
            return Some(AlertState::FireActive);
        }
    }

    wildlife_hit.then_some(AlertState::WildlifeActive)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FIRE: manual resolution only
// ═══════════════════════════════════════════════════════════════════════════

fn fire_enter(ctx: &mut EngineContext) {
    warn!("FIRE: detected at {} ms, SOS running until confirmed", ctx.now_ms);
}

fn fire_update(ctx: &mut EngineContext) -> Option<AlertState> {
    if ctx.input.b_pressed {
        push(ctx, AlertEvent::FireCancelled);
        return Some(AlertState::Normal);
    }
    None
}

fn fire_exit(ctx: &mut EngineContext) {
    ctx.fire.clear();
    info!("FIRE: cancelled by operator");
}

// ═══════════════════════════════════════════════════════════════════════════
//  WILDLIFE: manual cancel or auto-expiry
// ═══════════════════════════════════════════════════════════════════════════

fn wildlife_enter(ctx: &mut EngineContext) {
    if let Some(rec) = ctx.wildlife.current_record() {
        warn!("WILDLIFE: {} ({})", rec.label, rec.evidence);
    }
}

fn wildlife_update(ctx: &mut EngineContext) -> Option<AlertState> {
    let Some(record) = ctx.wildlife.current() else {
        return Some(AlertState::Normal);
    };

    if ctx.input.any_pressed() {
        push(ctx, AlertEvent::WildlifeCancelled { record });
        return Some(AlertState::Normal);
    }

    roll_wildlife(ctx);

    if ctx.wildlife.expired(ctx.now_ms, ctx.config.wildlife_alert_ms) {
        if let Some(record) = ctx.wildlife.current() {
            push(ctx, AlertEvent::WildlifeExpired { record });
        }
        return Some(AlertState::Normal);
    }

    None
}

fn wildlife_exit(ctx: &mut EngineContext) {
    if let Some(rec) = ctx.wildlife.clear_current() {
        info!("WILDLIFE: alert for '{}' cleared", rec.label);
    }
}
