//! Monitor service, the hexagonal core.
//!
//! [`MonitorService`] owns the alert arbiter, the input router, the visual
//! coordinator and the engine context. All I/O flows through port traits
//! injected at call sites, so the whole service runs against mocks.
//!
//! ```text
//!   InputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!   ClockPort ──▶ │        MonitorService        │ ──▶ LedMatrix
//!                 │ inputs · sensors · alerts ·  │ ──▶ display / status LED
//!                 │ visual                       │ ──▶ buzzer
//!                 └──────────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. Sample inputs, debounce, compute edges.
//! 2. Advance every enabled sensor channel.
//! 3. Alert arbitration (detections, cancellations, expiry).
//! 4. Alert side effects: cues and events.
//! 5. Channel cycling.
//! 6. Visual output: LED frame, status LED, display, SOS blip.
//! 7. Telemetry.

use log::{debug, info};
use smart_leds::{RGB8, SmartLedsWrite};

use crate::alert::{AlertArbiter, AlertEvent, AlertState};
use crate::config::StationConfig;
use crate::drivers::buzzer::{self, Cue};
use crate::drivers::button::{InputRouter, JoystickZone};
use crate::drivers::display::{self, Screen, Splash};
use crate::drivers::led_matrix::{LedMatrix, solid_frame};
use crate::drivers::status_led::StatusColour;
use crate::error::{Error, Result};
use crate::sensors::{ChannelId, CycleDirection, SensorBank};
use crate::visual::{RenderProgram, VisualCoordinator};

use super::context::{EngineContext, FALLBACK_HOUR};
use super::events::{AppEvent, Reading};
use super::ports::{ClockPort, EventSink, StationIo};

/// Matrix colour during the start-up self-test.
pub const SELF_TEST_COLOUR: RGB8 = RGB8 { r: 0, g: 0, b: 255 };

/// Summary of one tick, for callers that do not want to parse events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub state: AlertState,
    /// Time since `state` was entered.
    pub in_state_ms: u32,
    pub program: RenderProgram,
    pub selected: Option<ChannelId>,
}

pub struct MonitorService {
    arbiter: AlertArbiter,
    ctx: EngineContext,
    inputs: InputRouter,
    visual: VisualCoordinator,
    last_cycle_ms: Option<u32>,
    last_telemetry_ms: Option<u32>,
}

impl MonitorService {
    /// Construct the service. Rejects an invalid configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: StationConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        let inputs = InputRouter::new(config.debounce_ms);
        let visual = VisualCoordinator::new(config.animation_frame_ms, 0);
        Ok(Self {
            arbiter: AlertArbiter::new(),
            ctx: EngineContext::new(config),
            inputs,
            visual,
            last_cycle_ms: None,
            last_telemetry_ms: None,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the start-up sequence and anchor all timers to the uptime at
    /// which it finishes.
    ///
    /// Boot screen and jingle, LED self-test, then the title and banner
    /// screens, each held for `splash_hold_ms`.
    pub fn start<H, B>(
        &mut self,
        clock: &impl ClockPort,
        hw: &mut H,
        leds: &LedMatrix<B>,
        sink: &mut impl EventSink,
    ) -> Result<()>
    where
        H: StationIo + ?Sized,
        B: SmartLedsWrite<Color = RGB8>,
        B::Error: core::fmt::Debug,
    {
        hw.set_status_led(StatusColour::Off)?;
        display::render(hw, &Screen::Splash(Splash::Booting))?;
        buzzer::play(hw, Cue::Startup)?;

        let self_test_ms = self.ctx.config.led_self_test_ms;
        if self_test_ms > 0 {
            debug!("LED self-test for {} ms", self_test_ms);
            leds.transmit(&solid_frame(SELF_TEST_COLOUR))?;
            hw.delay_ms(self_test_ms);
        }
        leds.clear()?;

        let hold_ms = self.ctx.config.splash_hold_ms;
        for splash in [Splash::Title, Splash::Banner] {
            display::render(hw, &Screen::Splash(splash))?;
            hw.delay_ms(hold_ms);
        }

        let now = clock.uptime_ms();
        self.ctx.now_ms = now;
        self.ctx.fire.reset(now);
        self.visual = VisualCoordinator::new(self.ctx.config.animation_frame_ms, now);

        let features = self.ctx.config.features;
        for (feature, on) in features.iter() {
            if on {
                info!("Module enabled: {}", feature.label());
            }
        }
        sink.emit(&AppEvent::Started(features));
        info!("MonitorService started ({} modules)", features.enabled_count());
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle. Any collaborator failure aborts the tick and
    /// comes back as [`Error::Device`].
    pub fn tick<H, B>(
        &mut self,
        clock: &impl ClockPort,
        hw: &mut H,
        leds: &LedMatrix<B>,
        sink: &mut impl EventSink,
    ) -> Result<TickReport>
    where
        H: StationIo + ?Sized,
        B: SmartLedsWrite<Color = RGB8>,
        B::Error: core::fmt::Debug,
    {
        let now = clock.uptime_ms();
        self.ctx.now_ms = now;
        self.ctx.hour = clock.current_hour().unwrap_or(FALLBACK_HOUR);
        self.ctx.tick_count += 1;
        self.ctx.alert_events.clear();

        // 1. Inputs
        let raw = hw.sample()?;
        self.ctx.input = self.inputs.update(raw, now);

        // 2. Sensors
        self.ctx.sensors.advance_enabled(
            &self.ctx.config.features,
            self.ctx.hour,
            self.ctx.config.rain_probability,
            &mut self.ctx.rng,
        );

        // 3. Alerts
        let prev_state = self.arbiter.current_state();
        self.arbiter.tick(&mut self.ctx);
        let state = self.arbiter.current_state();

        // 4. Alert side effects
        let events = core::mem::take(&mut self.ctx.alert_events);
        let mut cancelled = false;
        for event in &events {
            cancelled |= matches!(
                event,
                AlertEvent::FireCancelled | AlertEvent::WildlifeCancelled { .. }
            );
            self.apply_alert_event(*event, hw, sink)?;
        }
        if state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: state,
            });
        }

        // 5. Channel cycling
        if !cancelled {
            self.handle_cycling(state, hw, sink)?;
        }

        // 6. Visual output
        let out = self.visual.compose(state, &self.ctx);
        self.visual.drive(&out, hw, leds)?;

        // 7. Telemetry
        self.report_if_due(sink);

        Ok(TickReport {
            tick: self.ctx.tick_count,
            state,
            in_state_ms: self.arbiter.ms_in_state(now),
            program: out.program,
            selected: self.ctx.selected,
        })
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> AlertState {
        self.arbiter.current_state()
    }

    pub fn tick_count(&self) -> u64 {
        self.ctx.tick_count
    }

    pub fn selected_channel(&self) -> Option<ChannelId> {
        self.ctx.selected
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn config(&self) -> &StationConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_alert_event<H>(
        &mut self,
        event: AlertEvent,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) -> Result<()>
    where
        H: StationIo + ?Sized,
    {
        match event {
            AlertEvent::FireTriggered { forced } => {
                sink.emit(&AppEvent::FireTriggered {
                    at_ms: self.ctx.now_ms,
                    forced,
                });
            }
            AlertEvent::FireCancelled => {
                hw.set_status_led(StatusColour::Off)?;
                sink.emit(&AppEvent::FireCancelled);
                buzzer::play(hw, Cue::FireCancelled)?;
            }
            AlertEvent::WildlifeDetected { record } => {
                let rec = self.ctx.wildlife.record(record);
                sink.emit(&AppEvent::WildlifeDetected {
                    label: rec.label,
                    evidence: rec.evidence,
                });
                buzzer::play(hw, Cue::Wildlife)?;
            }
            AlertEvent::WildlifeCancelled { record } => {
                let label = self.ctx.wildlife.record(record).label;
                sink.emit(&AppEvent::WildlifeCancelled { label });
            }
            AlertEvent::WildlifeExpired { record } => {
                let label = self.ctx.wildlife.record(record).label;
                sink.emit(&AppEvent::WildlifeExpired { label });
            }
        }
        Ok(())
    }

    /// Joystick Left/Right, Button A (previous) and Button B (next, not
    /// during a fire alert) move the displayed channel.
    fn handle_cycling<H>(&mut self, state: AlertState, hw: &mut H, sink: &mut impl EventSink) -> Result<()>
    where
        H: StationIo + ?Sized,
    {
        let features = self.ctx.config.features;
        self.ctx.selected = SensorBank::ensure_enabled(self.ctx.selected, &features);

        let now = self.ctx.now_ms;
        let repeat_ok = self
            .last_cycle_ms
            .is_none_or(|t| now.wrapping_sub(t) >= self.ctx.config.cycle_repeat_ms);
        if !repeat_ok || features.channel_count() == 0 {
            return Ok(());
        }

        let input = self.ctx.input;
        let (direction, joystick) = match input.zone {
            JoystickZone::Left => (Some(CycleDirection::Previous), true),
            JoystickZone::Right => (Some(CycleDirection::Next), true),
            JoystickZone::Center if input.a_pressed => (Some(CycleDirection::Previous), false),
            JoystickZone::Center if input.b_pressed && state != AlertState::FireActive => {
                (Some(CycleDirection::Next), false)
            }
            JoystickZone::Center => (None, false),
        };
        let Some(direction) = direction else {
            return Ok(());
        };

        let next = SensorBank::cycle(self.ctx.selected, direction, &features);
        self.last_cycle_ms = Some(now);
        if joystick {
            buzzer::play(hw, Cue::CycleClick)?;
        }
        if let Some(id) = next {
            debug!("Channel {:?} -> {:?}", self.ctx.selected, id);
            self.ctx.selected = Some(id);
            sink.emit(&AppEvent::ChannelSelected(id));
        }
        Ok(())
    }

    fn report_if_due(&mut self, sink: &mut impl EventSink) {
        let now = self.ctx.now_ms;
        let due = self
            .last_telemetry_ms
            .is_none_or(|t| now.wrapping_sub(t) >= self.ctx.config.telemetry_interval_ms);
        if !due {
            return;
        }
        self.last_telemetry_ms = Some(now);

        let features = &self.ctx.config.features;
        for ch in self.ctx.sensors.channels() {
            if !features.is_enabled(ch.id().feature()) {
                continue;
            }
            sink.emit(&AppEvent::Reading(Reading {
                channel: ch.id(),
                value: ch.value(),
                unit: ch.unit(),
                moving_average: ch.moving_average(),
                anomalous: ch.is_anomalous(),
            }));
        }
        sink.emit(&AppEvent::AnomalySummary(self.ctx.sensors.anomalies(features)));
    }
}
