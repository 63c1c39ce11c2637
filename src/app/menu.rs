//! Start-up configuration menu.
//!
//! The operator walks the five modules with the joystick, toggles the
//! highlighted one with Button A and confirms with Button B. Joystick
//! moves and toggles are rate-limited so a held stick or button does not
//! race through the list.
//!
//! [`ConfigMenu`] is the navigation logic alone. [`MenuSession`] runs it
//! against the board: it samples and debounces the inputs and redraws the
//! highlighted entry whenever it changes.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::{Feature, FeatureToggles, StationConfig};
use crate::drivers::button::{InputFrame, InputRouter, JoystickZone};
use crate::drivers::display::{self, Screen, Splash};
use crate::error::DeviceError;

use super::ports::{ClockPort, DrawSurface, InputPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Idle,
    Moved { cursor: usize },
    Toggled { feature: Feature, enabled: bool },
    /// Configuration confirmed; the menu is closed.
    Finished(FeatureToggles),
}

/// One row as an adapter would draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub feature: Feature,
    pub enabled: bool,
    pub highlighted: bool,
}

pub struct ConfigMenu {
    toggles: FeatureToggles,
    cursor: usize,
    repeat_ms: u32,
    last_action_ms: Option<u32>,
    finished: bool,
}

impl ConfigMenu {
    pub fn new(initial: FeatureToggles, repeat_ms: u32) -> Self {
        Self {
            toggles: initial,
            cursor: 0,
            repeat_ms,
            last_action_ms: None,
            finished: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn toggles(&self) -> FeatureToggles {
        self.toggles
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn entries(&self) -> impl Iterator<Item = MenuEntry> + '_ {
        self.toggles
            .iter()
            .enumerate()
            .map(move |(i, (feature, enabled))| MenuEntry {
                feature,
                enabled,
                highlighted: i == self.cursor,
            })
    }

    /// Feed one tick of conditioned input.
    pub fn update(&mut self, input: &InputFrame, now_ms: u32) -> MenuOutcome {
        if self.finished {
            return MenuOutcome::Finished(self.toggles);
        }
        if input.b_pressed {
            self.finished = true;
            return MenuOutcome::Finished(self.toggles);
        }

        let ready = self
            .last_action_ms
            .is_none_or(|t| now_ms.wrapping_sub(t) >= self.repeat_ms);
        if !ready {
            return MenuOutcome::Idle;
        }

        let n = Feature::COUNT;
        let outcome = match input.zone {
            JoystickZone::Left => {
                self.cursor = (self.cursor + n - 1) % n;
                MenuOutcome::Moved { cursor: self.cursor }
            }
            JoystickZone::Right => {
                self.cursor = (self.cursor + 1) % n;
                MenuOutcome::Moved { cursor: self.cursor }
            }
            JoystickZone::Center if input.a_pressed => {
                let feature = Feature::ALL[self.cursor];
                let enabled = self.toggles.toggle(feature);
                MenuOutcome::Toggled { feature, enabled }
            }
            JoystickZone::Center => return MenuOutcome::Idle,
        };
        self.last_action_ms = Some(now_ms);
        outcome
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct MenuSession {
    menu: ConfigMenu,
    inputs: InputRouter,
}

impl MenuSession {
    /// Start from `initial`, with the debounce and repeat timing of `config`.
    pub fn new(initial: FeatureToggles, config: &StationConfig) -> Self {
        Self {
            menu: ConfigMenu::new(initial, config.cycle_repeat_ms),
            inputs: InputRouter::new(config.debounce_ms),
        }
    }

    pub fn menu(&self) -> &ConfigMenu {
        &self.menu
    }

    /// Show the set-up banner for `hold_ms`, then the first entry.
    pub fn open<H>(&self, hw: &mut H, hold_ms: u32) -> Result<(), DeviceError>
    where
        H: DrawSurface + DelayNs + ?Sized,
    {
        display::render(hw, &Screen::Splash(Splash::Setup))?;
        hw.delay_ms(hold_ms);
        self.redraw(hw)
    }

    /// Sample the inputs once and feed the menu.
    pub fn step<H>(&mut self, clock: &impl ClockPort, hw: &mut H) -> Result<MenuOutcome, DeviceError>
    where
        H: InputPort + DrawSurface + ?Sized,
    {
        let was_finished = self.menu.is_finished();
        let now = clock.uptime_ms();
        let input = self.inputs.update(hw.sample()?, now);
        let outcome = self.menu.update(&input, now);
        match outcome {
            MenuOutcome::Moved { cursor } => {
                debug!("Menu: cursor -> {}", Feature::ALL[cursor].label());
                self.redraw(hw)?;
            }
            MenuOutcome::Toggled { feature, enabled } => {
                info!("Menu: {} {}", feature.label(), if enabled { "ON" } else { "OFF" });
                self.redraw(hw)?;
            }
            MenuOutcome::Finished(toggles) if !was_finished => {
                info!("Menu: confirmed with {} modules", toggles.enabled_count());
            }
            MenuOutcome::Finished(_) | MenuOutcome::Idle => {}
        }
        Ok(outcome)
    }

    fn redraw<H: DrawSurface + ?Sized>(&self, hw: &mut H) -> Result<(), DeviceError> {
        let feature = Feature::ALL[self.menu.cursor()];
        display::render(
            hw,
            &Screen::Menu {
                feature,
                enabled: self.menu.toggles().is_enabled(feature),
            },
        )
    }
}
