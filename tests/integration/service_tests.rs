//! End-to-end tests for the MonitorService tick pipeline.
//!
//! Inputs → sensors → alert arbitration → LED bus / display / buzzer /
//! events, all against the mocks in `mock_hw`.

use envmon::alert::AlertState;
use envmon::alert::sos::{SOS_COLOUR, sos_phase};
use envmon::app::events::AppEvent;
use envmon::app::ports::RawInputs;
use envmon::app::service::{MonitorService, SELF_TEST_COLOUR, TickReport};
use envmon::config::{Feature, FeatureToggles, StationConfig};
use envmon::drivers::led_matrix::{LedMatrix, MATRIX_PIXELS, OFF};
use envmon::drivers::status_led::StatusColour;
use envmon::error::{DeviceError, Error, Peripheral};
use envmon::sensors::ChannelId;
use envmon::visual::RenderProgram;

use super::mock_hw::{MockBoard, MockClock, MockLedBus, RecordingSink};

struct Harness {
    svc: MonitorService,
    clock: MockClock,
    board: MockBoard,
    bus: MockLedBus,
    leds: LedMatrix<MockLedBus>,
    sink: RecordingSink,
    step_ms: u32,
}

impl Harness {
    fn new(mut config: StationConfig) -> Self {
        config.seed.get_or_insert(42);
        let step_ms = config.tick_interval_ms;
        let bus = MockLedBus::default();
        let mut h = Self {
            svc: MonitorService::new(config).unwrap(),
            clock: MockClock::new(),
            board: MockBoard::new(),
            leds: LedMatrix::new(bus.clone()),
            bus,
            sink: RecordingSink::new(),
            step_ms,
        };
        h.svc
            .start(&h.clock, &mut h.board, &h.leds, &mut h.sink)
            .unwrap();
        h
    }

    fn try_step(&mut self) -> Result<TickReport, Error> {
        self.clock.advance(self.step_ms);
        self.svc
            .tick(&self.clock, &mut self.board, &self.leds, &mut self.sink)
    }

    fn step(&mut self) -> TickReport {
        self.try_step().unwrap()
    }

    /// Hold an input through the debounce window; returns the report of
    /// the tick in which the edge lands.
    fn press(&mut self, set: impl Fn(&mut RawInputs)) -> TickReport {
        set(&mut self.board.inputs);
        self.step();
        let report = self.step();
        self.board.inputs = RawInputs::default();
        report
    }

    fn run_until(&mut self, max_ticks: u32, pred: impl Fn(&TickReport) -> bool) -> Option<TickReport> {
        (0..max_ticks).map(|_| self.step()).find(|r| pred(r))
    }
}

fn fire_only() -> StationConfig {
    StationConfig {
        features: FeatureToggles::only(&[Feature::Fire]),
        fire_isolated_probability: 0.0,
        ..StationConfig::default()
    }
}

fn channels_only(features: &[Feature]) -> StationConfig {
    StationConfig {
        features: FeatureToggles::only(features),
        ..StationConfig::default()
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_runs_self_test_then_blanks_outputs() {
    let h = Harness::new(StationConfig::default());
    assert_eq!(h.board.tones(), vec![261, 329, 392, 523]);
    assert_eq!(h.board.last_status(), Some(StatusColour::Off));

    let frames = h.bus.frames.borrow();
    assert_eq!(frames.len(), 2);
    assert!(frames[0].iter().all(|&c| c == SELF_TEST_COLOUR));
    assert!(frames[1].iter().all(|&c| c == OFF));

    // Boot, title and banner screens.
    assert_eq!(h.board.flushes(), 3);
    assert_eq!(
        h.sink.events.first(),
        Some(&AppEvent::Started(FeatureToggles::all()))
    );
}

#[test]
fn self_test_can_be_skipped() {
    let h = Harness::new(StationConfig {
        led_self_test_ms: 0,
        ..StationConfig::default()
    });
    assert_eq!(h.bus.frame_count(), 1);
    assert!(h.bus.last_frame().unwrap().iter().all(|&c| c == OFF));
}

#[test]
fn every_tick_sends_one_full_frame_and_one_display_flush() {
    let mut h = Harness::new(StationConfig::default());
    let frames_at_start = h.bus.frame_count();
    let flushes_at_start = h.board.flushes();
    for _ in 0..20 {
        h.step();
    }
    let frames = h.bus.frames.borrow();
    assert_eq!(frames.len(), frames_at_start + 20);
    assert!(frames.iter().all(|f| f.len() == MATRIX_PIXELS));
    assert_eq!(h.board.flushes(), flushes_at_start + 20);
}

// ── Fire ──────────────────────────────────────────────────────

#[test]
fn isolated_fire_is_forced_after_timeout() {
    let mut h = Harness::new(fire_only());
    for _ in 0..49 {
        let r = h.step();
        assert_eq!(r.state, AlertState::Normal, "early trigger at tick {}", r.tick);
        assert_eq!(r.program, RenderProgram::Ambient);
    }

    let r = h.step();
    assert_eq!(h.clock.now_ms, 5000);
    assert_eq!(r.state, AlertState::FireActive);
    assert_eq!(r.program, RenderProgram::Sos);
    assert!(h.sink.events.contains(&AppEvent::FireTriggered {
        at_ms: 5000,
        forced: true
    }));
    assert!(h.sink.events.contains(&AppEvent::StateChanged {
        from: AlertState::Normal,
        to: AlertState::FireActive
    }));

    // First SOS mark starts immediately.
    assert!(h.bus.last_frame().unwrap().iter().all(|&c| c == SOS_COLOUR));
    assert_eq!(h.board.last_status(), Some(StatusColour::Red));
    assert_eq!(h.board.tones().last(), Some(&650));
}

#[test]
fn sos_frames_follow_the_waveform() {
    let mut h = Harness::new(fire_only());
    h.run_until(60, |r| r.state == AlertState::FireActive).unwrap();
    let fired_at = h.clock.now_ms;

    for _ in 0..60 {
        h.step();
        let elapsed = h.clock.now_ms - fired_at;
        let frame = h.bus.last_frame().unwrap();
        let expected = if sos_phase(elapsed) { SOS_COLOUR } else { OFF };
        assert!(
            frame.iter().all(|&c| c == expected),
            "wrong frame {elapsed} ms into SOS"
        );
    }
}

#[test]
fn sos_tone_sounds_once_per_mark_across_periods() {
    let mut h = Harness::new(fire_only());
    h.run_until(60, |r| r.state == AlertState::FireActive).unwrap();
    let blips_before = h.board.tones().iter().filter(|&&f| f == 650).count();
    assert_eq!(blips_before, 1);

    // Two full 5400 ms periods at 100 ms ticks, trigger tick included.
    for _ in 1..108 {
        h.step();
    }
    assert_eq!(h.board.tones().iter().filter(|&&f| f == 650).count(), 18);
}

#[test]
fn fire_outranks_wildlife_in_the_same_tick() {
    let config = StationConfig {
        features: FeatureToggles::only(&[Feature::Temperature, Feature::Fire, Feature::Wildlife]),
        fire_probability: 1.0,
        wildlife_probability: 1.0,
        ..StationConfig::default()
    };
    let mut h = Harness::new(config);
    let r = h.step();
    assert_eq!(r.state, AlertState::FireActive);
    assert_eq!(h.sink.count(|e| matches!(e, AppEvent::WildlifeDetected { .. })), 0);
    assert!(!h.board.tones().contains(&440));
    assert_eq!(h.board.last_status(), Some(StatusColour::Red));
}

#[test]
fn button_b_cancels_fire_and_rearms_detector() {
    let mut h = Harness::new(fire_only());
    h.run_until(60, |r| r.state == AlertState::FireActive).unwrap();

    let r = h.press(|i| i.button_b = true);
    assert_eq!(r.state, AlertState::Normal);
    assert!(h.sink.events.contains(&AppEvent::FireCancelled));
    assert!(h.board.tones().contains(&880));

    // Forced window restarts from the previous trigger.
    let again = h
        .run_until(100, |r| r.state == AlertState::FireActive)
        .unwrap();
    assert_eq!(again.state, AlertState::FireActive);
    assert_eq!(h.clock.now_ms, 10_000);
}

#[test]
fn other_buttons_do_not_cancel_fire() {
    let mut h = Harness::new(fire_only());
    h.run_until(60, |r| r.state == AlertState::FireActive).unwrap();

    let r = h.press(|i| i.button_a = true);
    assert_eq!(r.state, AlertState::FireActive);
    let r = h.press(|i| i.joystick_button = true);
    assert_eq!(r.state, AlertState::FireActive);
    assert!(!h.sink.events.contains(&AppEvent::FireCancelled));
}

#[test]
fn fire_disabled_never_shows_sos() {
    let config = StationConfig {
        features: FeatureToggles::only(&[Feature::Temperature]),
        fire_probability: 1.0,
        ..StationConfig::default()
    };
    let mut h = Harness::new(config);
    for _ in 0..100 {
        let r = h.step();
        assert_eq!(r.state, AlertState::Normal);
        assert_ne!(r.program, RenderProgram::Sos);
    }
}

// ── Wildlife ──────────────────────────────────────────────────

#[test]
fn wildlife_alert_expires_after_timeout() {
    let config = StationConfig {
        features: FeatureToggles::only(&[Feature::Wildlife]),
        wildlife_alert_ms: 1000,
        ..StationConfig::default()
    };
    let mut h = Harness::new(config);

    let mut last_detection = None;
    let mut expiries = 0;
    for _ in 0..3000 {
        let before = h.sink.events.len();
        let r = h.step();
        let now = h.clock.now_ms;
        for event in &h.sink.events[before..] {
            match event {
                AppEvent::WildlifeDetected { .. } => last_detection = Some(now),
                AppEvent::WildlifeExpired { .. } => {
                    let since = now - last_detection.unwrap();
                    assert_eq!(since, 1000, "expired {since} ms after detection");
                    expiries += 1;
                }
                _ => {}
            }
        }
        if r.state == AlertState::WildlifeActive {
            assert_eq!(h.board.last_status(), Some(StatusColour::Blue));
        }
    }
    assert!(expiries > 0, "no alert ever expired");
}

#[test]
fn any_button_cancels_wildlife_without_cycling() {
    let config = StationConfig {
        features: FeatureToggles::only(&[
            Feature::Temperature,
            Feature::Rainfall,
            Feature::Wildlife,
        ]),
        wildlife_probability: 1.0,
        ..StationConfig::default()
    };
    let mut h = Harness::new(config);
    let r = h.step();
    assert_eq!(r.state, AlertState::WildlifeActive);
    assert!(h.board.tones().ends_with(&[440, 440, 440]));

    let r = h.press(|i| i.button_a = true);
    assert_eq!(r.state, AlertState::Normal);
    assert_eq!(
        h.sink.count(|e| matches!(e, AppEvent::WildlifeCancelled { .. })),
        1
    );
    assert_eq!(h.sink.count(|e| matches!(e, AppEvent::ChannelSelected(_))), 0);
    assert_eq!(r.selected, Some(ChannelId::Temperature));
}

// ── Channel cycling ───────────────────────────────────────────

#[test]
fn cycling_skips_disabled_channels_and_is_rate_limited() {
    let mut h = Harness::new(channels_only(&[Feature::Temperature, Feature::Rainfall]));
    assert_eq!(h.svc.selected_channel(), Some(ChannelId::Temperature));

    let right = 4095;
    let left = 0;
    let centre = 2048;
    for x in [right, centre, right, left, left] {
        h.board.inputs.joystick_x = x;
        h.step();
    }

    let selected: Vec<_> = h
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ChannelSelected(id) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(
        selected,
        vec![ChannelId::Rainfall, ChannelId::Temperature, ChannelId::Rainfall]
    );
    assert_eq!(h.board.tones().iter().filter(|&&f| f == 440).count(), 3);
}

#[test]
fn buttons_cycle_in_normal_mode() {
    let mut h = Harness::new(channels_only(&[
        Feature::Temperature,
        Feature::WaterFlow,
        Feature::Rainfall,
    ]));
    let r = h.press(|i| i.button_b = true);
    assert_eq!(r.selected, Some(ChannelId::WaterFlow));
    h.step();
    h.step();
    let r = h.press(|i| i.button_a = true);
    assert_eq!(r.selected, Some(ChannelId::Temperature));
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_reports_enabled_channels_in_range() {
    let mut h = Harness::new(channels_only(&[Feature::Temperature, Feature::Rainfall]));
    h.step();

    let readings: Vec<_> = h
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Reading(r) => Some(*r),
            _ => None,
        })
        .collect();
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].channel, ChannelId::Temperature);
    assert_eq!(readings[0].unit, "C");
    assert!((15.0..=35.0).contains(&readings[0].value));
    assert_eq!(readings[1].unit, "mm/h");
    assert!((0.0..=100.0).contains(&readings[1].value));
    assert_eq!(
        h.sink.count(|e| matches!(e, AppEvent::AnomalySummary(_))),
        1
    );
}

// ── No modules ────────────────────────────────────────────────

#[test]
fn nothing_enabled_keeps_outputs_dark() {
    let mut h = Harness::new(channels_only(&[]));
    h.board.lit_pixels = 0;
    for _ in 0..10 {
        let r = h.step();
        assert_eq!(r.program, RenderProgram::Off);
        assert_eq!(r.selected, None);
    }
    assert!(h.bus.last_frame().unwrap().iter().all(|&c| c == OFF));
    assert_eq!(h.board.last_status(), Some(StatusColour::Off));
    assert!(h.board.lit_pixels > 0, "display should explain the idle state");
}

// ── Device failures ───────────────────────────────────────────

#[test]
fn led_bus_failure_surfaces_as_device_error() {
    let mut h = Harness::new(StationConfig::default());
    h.bus.fail.set(true);
    assert_eq!(
        h.try_step(),
        Err(Error::Device(DeviceError::TransmitFailed(Peripheral::LedBus)))
    );
    h.bus.fail.set(false);
    assert!(h.try_step().is_ok());
}

#[test]
fn display_and_input_failures_surface() {
    let mut h = Harness::new(StationConfig::default());
    h.board.fail_display = true;
    assert_eq!(
        h.try_step(),
        Err(Error::Device(DeviceError::Unavailable(Peripheral::Display)))
    );
    h.board.fail_display = false;
    h.board.fail_inputs = true;
    assert_eq!(
        h.try_step(),
        Err(Error::Device(DeviceError::Unavailable(Peripheral::Inputs)))
    );
}

#[test]
fn invalid_config_is_rejected() {
    let config = StationConfig {
        wildlife_probability: -0.1,
        ..StationConfig::default()
    };
    assert!(matches!(MonitorService::new(config), Err(Error::Config(_))));
}
