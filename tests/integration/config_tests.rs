//! Configuration sources, the start-up menu, and the host adapters wired
//! into a running service.

use std::fs;

use envmon::adapters::config_file::JsonConfigFile;
use envmon::adapters::hardware::{SimBoard, SimButton, SimLedBus};
use envmon::adapters::log_sink::LogEventSink;
use envmon::adapters::time::SteppedClock;
use envmon::alert::AlertState;
use envmon::app::events::AppEvent;
use envmon::app::menu::{MenuOutcome, MenuSession};
use envmon::app::ports::{ConfigError, ConfigPort, RawInputs};
use envmon::app::service::MonitorService;
use envmon::config::{Feature, FeatureToggles, StationConfig};
use envmon::drivers::led_matrix::{LedMatrix, MATRIX_PIXELS};
use envmon::sensors::ChannelId;

use super::mock_hw::{MockBoard, MockClock, MockLedBus, RecordingSink};

fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("envmon-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn json_file_loads_and_validates() {
    let path = temp_file(
        "ok.json",
        r#"{ "features": ["temperature", "fire"], "seed": 9, "wildlife_alert_ms": 2000 }"#,
    );
    let cfg = JsonConfigFile::new(&path).load().unwrap();
    assert_eq!(cfg.features, FeatureToggles::only(&[Feature::Temperature, Feature::Fire]));
    assert_eq!(cfg.seed, Some(9));
    assert_eq!(cfg.wildlife_alert_ms, 2000);
    fs::remove_file(path).unwrap();
}

#[test]
fn json_file_rejects_bad_values() {
    let path = temp_file("bad.json", r#"{ "tick_interval_ms": 0 }"#);
    assert!(matches!(
        JsonConfigFile::new(&path).load(),
        Err(ConfigError::ValidationFailed(_))
    ));
    fs::remove_file(path).unwrap();
}

#[test]
fn serialised_default_reloads_identically() {
    let text = serde_json::to_string(&StationConfig::default()).unwrap();
    assert_eq!(JsonConfigFile::parse(&text).unwrap(), StationConfig::default());
}

/// Hold an input for two ticks, release it for two, and report the first
/// thing the menu did.
fn menu_press(
    session: &mut MenuSession,
    clock: &mut MockClock,
    board: &mut MockBoard,
    set: impl Fn(&mut RawInputs),
) -> MenuOutcome {
    let mut first = MenuOutcome::Idle;
    for held in [true, true, false, false] {
        board.inputs = RawInputs::default();
        if held {
            set(&mut board.inputs);
        }
        clock.advance(100);
        let outcome = session.step(&*clock, board).unwrap();
        if first == MenuOutcome::Idle {
            first = outcome;
        }
    }
    first
}

#[test]
fn menu_session_selects_modules_for_running_service() {
    let defaults = StationConfig {
        seed: Some(1),
        ..StationConfig::default()
    };
    let mut clock = MockClock::new();
    let mut board = MockBoard::new();
    let mut session = MenuSession::new(FeatureToggles::none(), &defaults);
    session.open(&mut board, defaults.splash_hold_ms).unwrap();
    assert_eq!(board.flushes(), 2);

    let right = |i: &mut RawInputs| i.joystick_x = 4095;
    let left = |i: &mut RawInputs| i.joystick_x = 0;
    let a = |i: &mut RawInputs| i.button_a = true;
    let b = |i: &mut RawInputs| i.button_b = true;

    assert_eq!(menu_press(&mut session, &mut clock, &mut board, right), MenuOutcome::Moved { cursor: 1 });
    assert_eq!(menu_press(&mut session, &mut clock, &mut board, right), MenuOutcome::Moved { cursor: 2 });
    assert_eq!(
        menu_press(&mut session, &mut clock, &mut board, a),
        MenuOutcome::Toggled {
            feature: Feature::Rainfall,
            enabled: true
        }
    );
    menu_press(&mut session, &mut clock, &mut board, left);
    menu_press(&mut session, &mut clock, &mut board, left);
    assert_eq!(
        menu_press(&mut session, &mut clock, &mut board, a),
        MenuOutcome::Toggled {
            feature: Feature::Temperature,
            enabled: true
        }
    );
    let chosen = FeatureToggles::only(&[Feature::Temperature, Feature::Rainfall]);
    assert_eq!(
        menu_press(&mut session, &mut clock, &mut board, b),
        MenuOutcome::Finished(chosen)
    );
    // Four moves and two toggles, one redraw each.
    assert_eq!(board.flushes(), 2 + 6);

    let config = StationConfig {
        features: chosen,
        ..defaults
    };
    let mut svc = MonitorService::new(config).unwrap();
    let leds = LedMatrix::new(MockLedBus::default());
    let mut sink = RecordingSink::new();
    svc.start(&clock, &mut board, &leds, &mut sink).unwrap();
    for _ in 0..3 {
        clock.advance(100);
        svc.tick(&clock, &mut board, &leds, &mut sink).unwrap();
    }

    assert_eq!(sink.events.first(), Some(&AppEvent::Started(chosen)));
    assert_eq!(svc.selected_channel(), Some(ChannelId::Temperature));
    assert!(sink.events.iter().all(|e| match e {
        AppEvent::Reading(r) => r.channel != ChannelId::WaterFlow,
        _ => true,
    }));
}

#[test]
fn sim_adapters_run_the_service() {
    let config = StationConfig {
        features: FeatureToggles::only(&[Feature::Fire, Feature::Temperature]),
        fire_probability: 1.0,
        seed: Some(3),
        ..StationConfig::default()
    };
    let step = config.tick_interval_ms;
    let mut svc = MonitorService::new(config).unwrap();
    let mut clock = SteppedClock::new(Some(6));
    let mut board = SimBoard::new(false);
    let leds = LedMatrix::new(SimLedBus::new());
    let mut sink = LogEventSink::new();

    svc.start(&clock, &mut board, &leds, &mut sink).unwrap();
    clock.advance(step);
    let r = svc.tick(&clock, &mut board, &leds, &mut sink).unwrap();
    assert_eq!(r.state, AlertState::FireActive);

    board.set_button(SimButton::B, true);
    for _ in 0..2 {
        clock.advance(step);
        svc.tick(&clock, &mut board, &leds, &mut sink).unwrap();
    }
    board.release_all();
    assert_eq!(svc.state(), AlertState::Normal);
    assert!(board.flush_count() >= 3);
    assert!(board.tone_count() > 0);

    let bus = leds.into_inner();
    // Self-test, blank, then three ticks.
    assert_eq!(bus.frame_count(), 5);
    assert_eq!(bus.last_words().len(), MATRIX_PIXELS);
}
