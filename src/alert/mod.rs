//! Alert arbitration state machine.
//!
//! Same table-driven shape as a classic embedded FSM: one row per
//! [`AlertState`] holding `on_enter`, `on_exit` and `on_update` function
//! pointers, all operating on the shared [`EngineContext`].
//!
//! ```text
//!  ┌───────────────────────────────────────────────────────────┐
//!  │  AlertArbiter                                             │
//!  │  ┌────────────────┬──────────┬──────────┬───────────────┐ │
//!  │  │ AlertState     │ on_enter │ on_exit  │ on_update     │ │
//!  │  ├────────────────┼──────────┼──────────┼───────────────┤ │
//!  │  │ Normal         │    -     │    -     │ detect        │ │
//!  │  │ FireActive     │ fn(ctx)  │ fn(ctx)  │ confirm/B     │ │
//!  │  │ WildlifeActive │ fn(ctx)  │ fn(ctx)  │ cancel/expire │ │
//!  │  └────────────────┴──────────┴──────────┴───────────────┘ │
//!  └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one state is current. Fire and wildlife never hand over to each
//! other directly; every alert resolves through `Normal`. Because each
//! tick runs only the current state's `on_update`, an alert raised this
//! tick can first be cancelled on the next one.
//!
//! Handlers do not touch hardware. They push [`AlertEvent`]s into the
//! context outbox and the service turns those into tones and telemetry.

pub mod fire;
pub mod sos;
pub mod states;
pub mod wildlife;

use log::info;

use crate::app::context::EngineContext;

/// Top-level mode of the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlertState {
    Normal = 0,
    FireActive = 1,
    WildlifeActive = 2,
}

impl AlertState {
    pub const COUNT: usize = 3;

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Normal,
            1 => Self::FireActive,
            2 => Self::WildlifeActive,
            _ => {
                debug_assert!(false, "invalid alert state index: {idx}");
                Self::Normal
            }
        }
    }
}

/// Something the alert handlers want the outside world to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEvent {
    FireTriggered { forced: bool },
    FireCancelled,
    /// `record` indexes the wildlife catalog.
    WildlifeDetected { record: usize },
    WildlifeCancelled { record: usize },
    WildlifeExpired { record: usize },
}

/// Outbox capacity; a single tick produces at most three events.
pub const ALERT_OUTBOX_LEN: usize = 4;

pub type AlertOutbox = heapless::Vec<AlertEvent, ALERT_OUTBOX_LEN>;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

pub type AlertActionFn = fn(&mut EngineContext);

/// Returns `Some(next)` to transition, `None` to stay.
pub type AlertUpdateFn = fn(&mut EngineContext) -> Option<AlertState>;

pub struct StateDescriptor {
    pub id: AlertState,
    pub name: &'static str,
    pub on_enter: Option<AlertActionFn>,
    pub on_exit: Option<AlertActionFn>,
    pub on_update: AlertUpdateFn,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct AlertArbiter {
    table: [StateDescriptor; AlertState::COUNT],
    current: usize,
    /// Timestamp at which the current state was entered.
    entered_at_ms: u32,
}

impl Default for AlertArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertArbiter {
    pub fn new() -> Self {
        Self {
            table: states::build_state_table(),
            current: AlertState::Normal as usize,
            entered_at_ms: 0,
        }
    }

    /// Evaluate detections and cancellations for one tick.
    pub fn tick(&mut self, ctx: &mut EngineContext) {
        let next = (self.table[self.current].on_update)(ctx);
        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Jump to `next` regardless of the current state's update rule.
    #[cfg(test)]
    pub fn force_transition(&mut self, next: AlertState, ctx: &mut EngineContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> AlertState {
        AlertState::from_index(self.current)
    }

    pub fn state_name(&self) -> &'static str {
        self.table[self.current].name
    }

    /// Milliseconds spent in the current state.
    pub fn ms_in_state(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.entered_at_ms)
    }

    fn transition(&mut self, next_id: AlertState, ctx: &mut EngineContext) {
        let next_idx = next_id as usize;

        info!(
            "Alert transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.entered_at_ms = ctx.now_ms;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
