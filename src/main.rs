//! EnvMon station simulator, main entry point
//!
//! Runs the monitoring engine against simulated board peripherals.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimBoard            SimLedBus        LogEventSink             │
//! │  (Input+Indicator+   (SmartLedsWrite) (EventSink)              │
//! │   Tone+DrawSurface)                                            │
//! │  JsonConfigFile      HostClock / SteppedClock                  │
//! │  (ConfigPort)        (ClockPort)                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              MonitorService (pure logic)               │    │
//! │  │  Sensors · AlertArbiter · VisualCoordinator            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::io::{BufRead, Write as _};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info, warn};
use tracing::Level;

use envmon::adapters::config_file::{JsonConfigFile, StaticConfig};
use envmon::adapters::hardware::{SimBoard, SimButton, SimLedBus};
use envmon::adapters::log_sink::LogEventSink;
use envmon::adapters::time::{HostClock, SteppedClock};
use envmon::alert::AlertState;
use envmon::app::menu::{MenuOutcome, MenuSession};
use envmon::app::ports::{ClockPort, ConfigError, ConfigPort};
use envmon::app::service::MonitorService;
use envmon::config::{Feature, FeatureToggles, StationConfig};
use envmon::drivers::led_matrix::LedMatrix;
use envmon::pins;

/// Environmental monitoring station simulator
#[derive(Parser, Debug)]
#[command(name = "envmon")]
#[command(version)]
#[command(about = "Simulated environmental monitoring station with fire and wildlife alerts")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated modules to enable (temperature, water_flow, rainfall, fire, wildlife).
    /// Without it the start-up menu runs on stdin.
    #[arg(short, long, value_delimiter = ',', value_parser = parse_feature)]
    features: Option<Vec<Feature>>,

    /// Keep the configured modules and skip the start-up menu
    #[arg(long)]
    no_menu: bool,

    /// RNG seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Step a virtual clock instead of sleeping in real time
    #[arg(long)]
    fast: bool,

    /// Simulated operator presses a button once an alert has run this long
    #[arg(long)]
    auto_cancel_ms: Option<u32>,

    /// Print the display contents on every alert state change
    #[arg(long)]
    show_display: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn parse_feature(s: &str) -> Result<Feature, String> {
    Feature::ALL
        .into_iter()
        .find(|f| {
            let name = f.label().to_ascii_lowercase().replace(' ', "_");
            name == s.trim().to_ascii_lowercase()
        })
        .ok_or_else(|| format!("unknown module '{s}'"))
}

// ── Clock selection ───────────────────────────────────────────

enum SimClock {
    Host(HostClock),
    Stepped(SteppedClock),
}

impl ClockPort for SimClock {
    fn uptime_ms(&self) -> u32 {
        match self {
            Self::Host(c) => c.uptime_ms(),
            Self::Stepped(c) => c.uptime_ms(),
        }
    }

    fn current_hour(&self) -> Option<u8> {
        match self {
            Self::Host(c) => c.current_hour(),
            Self::Stepped(c) => c.current_hour(),
        }
    }
}

// ── Simulated operator ────────────────────────────────────────

/// Presses a cancel button once an alert has been up for `after_ms`,
/// holding it long enough to clear the debouncer.
struct Operator {
    after_ms: u32,
    hold_ticks: u32,
    holding: u32,
}

impl Operator {
    fn new(after_ms: u32, config: &StationConfig) -> Self {
        Self {
            after_ms,
            hold_ticks: hold_ticks(config),
            holding: 0,
        }
    }

    fn act(&mut self, state: AlertState, in_state_ms: u32, board: &mut SimBoard) {
        if self.holding > 0 {
            self.holding -= 1;
            if self.holding == 0 {
                board.release_all();
            }
            return;
        }
        if state == AlertState::Normal || in_state_ms < self.after_ms {
            return;
        }
        let button = match state {
            AlertState::FireActive => SimButton::B,
            _ => SimButton::Joystick,
        };
        info!("Operator: pressing {:?} to cancel {:?}", button, state);
        board.set_button(button, true);
        self.holding = self.hold_ticks;
    }
}

/// Ticks an input must be held for the debouncer to report it.
fn hold_ticks(config: &StationConfig) -> u32 {
    config.debounce_ms / config.tick_interval_ms + 2
}

// ── Start-up menu keys ────────────────────────────────────────

/// One menu key typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuKey {
    Left,
    Right,
    Toggle,
    Start,
}

impl MenuKey {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'l' => Some(Self::Left),
            'r' => Some(Self::Right),
            'a' => Some(Self::Toggle),
            'b' => Some(Self::Start),
            _ => None,
        }
    }
}

/// Replays typed keys as board inputs: each key is held, then released,
/// for `hold_ticks` ticks so both the debouncer and the menu repeat limit
/// see a clean press.
struct MenuKeys<R> {
    input: R,
    pending: VecDeque<MenuKey>,
    hold_ticks: u32,
    remaining: u32,
}

impl<R: BufRead> MenuKeys<R> {
    fn new(input: R, hold_ticks: u32) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
            hold_ticks,
            remaining: 0,
        }
    }

    fn feed(&mut self, board: &mut SimBoard) {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == self.hold_ticks {
                board.release_all();
            }
            return;
        }
        if self.pending.is_empty() {
            self.read_line();
        }
        let Some(key) = self.pending.pop_front() else {
            return;
        };
        match key {
            MenuKey::Left => board.set_joystick_x(0),
            MenuKey::Right => board.set_joystick_x(pins::ADC_MAX),
            MenuKey::Toggle => board.set_button(SimButton::A, true),
            MenuKey::Start => board.set_button(SimButton::B, true),
        }
        self.remaining = 2 * self.hold_ticks;
    }

    /// Blocks for one line. End of input confirms the menu as it stands.
    fn read_line(&mut self) {
        print!("menu [l/r move, a toggle, b start]> ");
        if let Err(e) = std::io::stdout().flush() {
            warn!("stdout flush failed: {e}");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => self.pending.push_back(MenuKey::Start),
            Ok(_) => {
                for c in line.chars().filter(|c| !c.is_whitespace()) {
                    match MenuKey::from_char(c) {
                        Some(key) => self.pending.push_back(key),
                        None => warn!("Menu: ignoring key '{c}'"),
                    }
                }
            }
        }
    }
}

fn advance(clock: &mut SimClock, tick_interval: u32) {
    match clock {
        SimClock::Stepped(c) => c.advance(tick_interval),
        SimClock::Host(_) => std::thread::sleep(Duration::from_millis(u64::from(tick_interval))),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    // ── 1. Logging ────────────────────────────────────────────
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    // Also bridges `log` records emitted by the library.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    info!("╔══════════════════════════════════════╗");
    info!("║  EnvMon station v{:<20}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => {
            let port = JsonConfigFile::new(path);
            match port.load() {
                Ok(cfg) => {
                    info!("Config loaded from {}", port.path().display());
                    cfg
                }
                Err(ConfigError::NotFound) => {
                    warn!("{} not found, using defaults", port.path().display());
                    StationConfig::default()
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("loading {}", port.path().display()));
                }
            }
        }
        None => StaticConfig(StationConfig::default())
            .load()
            .context("built-in defaults")?,
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // ── 3. Adapters ───────────────────────────────────────────
    let mut clock = if args.fast {
        SimClock::Stepped(SteppedClock::new(Some(12)))
    } else {
        SimClock::Host(HostClock::new())
    };
    let mut board = SimBoard::new(!args.fast);
    let leds = LedMatrix::new(SimLedBus::new());
    let mut sink = LogEventSink::new();
    let tick_interval = config.tick_interval_ms;

    // ── 3b. Module selection ──────────────────────────────────
    if let Some(features) = &args.features {
        config.features = FeatureToggles::only(features);
    } else if !args.no_menu {
        let mut session = MenuSession::new(config.features, &config);
        session
            .open(&mut board, config.splash_hold_ms)
            .context("menu display")?;
        let mut keys = MenuKeys::new(std::io::stdin().lock(), hold_ticks(&config));
        config.features = loop {
            keys.feed(&mut board);
            if let MenuOutcome::Finished(features) =
                session.step(&clock, &mut board).context("menu input")?
            {
                break features;
            }
            advance(&mut clock, tick_interval);
        };
        board.release_all();
    }
    if config.features.enabled_count() == 0 {
        warn!("No modules enabled; outputs stay dark");
    }
    let mut operator = args.auto_cancel_ms.map(|ms| Operator::new(ms, &config));

    // ── 4. Service ────────────────────────────────────────────
    let mut service = MonitorService::new(config).context("invalid configuration")?;
    service
        .start(&clock, &mut board, &leds, &mut sink)
        .context("start-up failed")?;

    info!("Station ready. Entering main loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    let mut last_state = service.state();
    let mut failures: u32 = 0;
    loop {
        if args.ticks.is_some_and(|n| service.tick_count() >= n) {
            break;
        }

        match service.tick(&clock, &mut board, &leds, &mut sink) {
            Ok(report) => {
                failures = 0;
                if report.state != last_state {
                    if args.show_display {
                        println!("{}", board.display_ascii());
                    }
                    last_state = report.state;
                }
                if let Some(op) = operator.as_mut() {
                    op.act(report.state, report.in_state_ms, &mut board);
                }
            }
            Err(e) => {
                failures += 1;
                error!("Tick {} failed: {}", service.tick_count(), e);
                if failures >= 10 {
                    bail!("giving up after {} consecutive failed ticks", failures);
                }
            }
        }

        advance(&mut clock, tick_interval);
    }

    let bus = leds.into_inner();
    info!(
        "Stopped after {} ticks: state {:?}, {} display frames, {} LED frames, {} tones",
        service.tick_count(),
        service.state(),
        board.flush_count(),
        bus.frame_count(),
        board.tone_count()
    );
    Ok(())
}
