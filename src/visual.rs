//! Visual output coordinator.
//!
//! Decides, once per tick, what every output shows:
//!
//! | Output      | FireActive          | WildlifeActive | Normal                          |
//! |-------------|---------------------|----------------|---------------------------------|
//! | LED matrix  | SOS (red / dark)    | ambient        | ambient (off if no module)      |
//! | Status LED  | red while SOS is on | blue           | red if anomalous, else green    |
//! | Display     | fire screen         | wildlife label | selected channel or placeholder |
//!
//! The ambient pattern is the flame animation or, with
//! [`AmbientStyle::LevelBars`], a bar per channel scaled to its reading.
//!
//! Exactly one [`RenderProgram`] owns the LED bus per tick and it always
//! sends a complete frame through [`LedMatrix::transmit`].

use embedded_hal::delay::DelayNs;
use log::debug;
use smart_leds::{RGB8, SmartLedsWrite};

use crate::alert::AlertState;
use crate::alert::sos::{SOS_COLOUR, SosEdge, sos_phase};
use crate::app::context::EngineContext;
use crate::app::ports::{DrawSurface, IndicatorPort, TonePort};
use crate::config::{AmbientStyle, Feature, FeatureToggles};
use crate::drivers::buzzer::{self, Cue};
use crate::drivers::display::{self, ChannelView, Screen};
use crate::drivers::led_matrix::{Frame, LedMatrix, MATRIX_HEIGHT, OFF, solid_frame};
use crate::drivers::led_patterns::{AmbientAnimation, level_bars_frame};
use crate::drivers::status_led::StatusColour;
use crate::error::DeviceError;
use crate::sensors::ChannelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderProgram {
    Ambient,
    Sos,
    Off,
}

impl RenderProgram {
    pub fn select(features: &FeatureToggles, state: AlertState) -> Self {
        if features.enabled_count() == 0 {
            Self::Off
        } else if features.is_enabled(Feature::Fire) && state == AlertState::FireActive {
            Self::Sos
        } else {
            Self::Ambient
        }
    }
}

/// Everything the outputs should show this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualOutput {
    pub program: RenderProgram,
    pub frame: Frame,
    pub status: StatusColour,
    pub screen: Screen,
    /// SOS waveform just switched on.
    pub sos_blip: bool,
    /// The displayed channel just went out of band.
    pub anomaly_cue: bool,
}

pub struct VisualCoordinator {
    ambient: AmbientAnimation,
    sos_edge: SosEdge,
    last_program: Option<RenderProgram>,
    /// (channel, anomalous) shown on the previous tick.
    last_shown: Option<(ChannelId, bool)>,
}

impl VisualCoordinator {
    pub fn new(animation_frame_ms: u32, now_ms: u32) -> Self {
        Self {
            ambient: AmbientAnimation::new(animation_frame_ms, now_ms),
            sos_edge: SosEdge::default(),
            last_program: None,
            last_shown: None,
        }
    }

    /// Pure decision step.
    pub fn compose(&mut self, state: AlertState, ctx: &EngineContext) -> VisualOutput {
        let features = &ctx.config.features;
        let program = RenderProgram::select(features, state);
        if self.last_program != Some(program) {
            debug!("LED program -> {:?}", program);
            self.last_program = Some(program);
        }

        let sos_elapsed = ctx.fire.elapsed_ms(ctx.now_ms);
        let mut sos_on = false;
        let frame = match program {
            RenderProgram::Sos => {
                sos_on = sos_elapsed.is_some_and(sos_phase);
                solid_frame(if sos_on { SOS_COLOUR } else { OFF })
            }
            RenderProgram::Ambient => match ctx.config.ambient_style {
                AmbientStyle::Flame => {
                    self.ambient.advance(ctx.now_ms);
                    self.ambient.render()
                }
                AmbientStyle::LevelBars => level_bars_frame(&bar_heights(ctx)),
            },
            RenderProgram::Off => solid_frame(OFF),
        };

        let sos_blip = match (program, sos_elapsed) {
            (RenderProgram::Sos, Some(elapsed)) => self.sos_edge.rising(elapsed),
            _ => {
                self.sos_edge.reset();
                false
            }
        };

        let view = if state == AlertState::Normal {
            ctx.selected.map(|id| channel_view(ctx, id))
        } else {
            None
        };

        let anomaly_cue = match view {
            Some(v) => {
                let was = self.last_shown == Some((v.channel, true));
                self.last_shown = Some((v.channel, v.anomalous));
                v.anomalous && !was
            }
            None => {
                self.last_shown = None;
                false
            }
        };

        let status = match state {
            AlertState::FireActive if sos_on => StatusColour::Red,
            AlertState::FireActive => StatusColour::Off,
            AlertState::WildlifeActive => StatusColour::Blue,
            AlertState::Normal => match view {
                Some(v) if v.anomalous => StatusColour::Red,
                Some(_) => StatusColour::Green,
                None => StatusColour::Off,
            },
        };

        let screen = match state {
            AlertState::FireActive => Screen::Fire,
            AlertState::WildlifeActive => Screen::Wildlife {
                label: ctx.wildlife.current_record().map_or("", |r| r.label),
            },
            AlertState::Normal => match view {
                _ if features.enabled_count() == 0 => Screen::NothingActive,
                _ if features.channel_count() == 0 => Screen::MonitoringOnly {
                    fire: features.is_enabled(Feature::Fire),
                },
                Some(v) => Screen::Channel(v),
                None => Screen::NothingActive,
            },
        };

        VisualOutput {
            program,
            frame,
            status,
            screen,
            sos_blip,
            anomaly_cue,
        }
    }

    /// Push a composed output to the hardware.
    pub fn drive<H, B>(&self, out: &VisualOutput, hw: &mut H, leds: &LedMatrix<B>) -> Result<(), DeviceError>
    where
        H: IndicatorPort + DrawSurface + TonePort + DelayNs + ?Sized,
        B: SmartLedsWrite<Color = RGB8>,
        B::Error: core::fmt::Debug,
    {
        leds.transmit(&out.frame)?;
        hw.set_status_led(out.status)?;
        display::render(hw, &out.screen)?;
        if out.sos_blip {
            buzzer::play(hw, Cue::SosBlip)?;
        }
        if out.anomaly_cue {
            buzzer::play(hw, Cue::Anomaly)?;
        }
        Ok(())
    }
}

/// Bar height per channel in channel order; disabled channels stay flat.
fn bar_heights(ctx: &EngineContext) -> [u8; ChannelId::COUNT] {
    let features = &ctx.config.features;
    ChannelId::ALL.map(|id| {
        if features.is_enabled(id.feature()) {
            ctx.sensors.channel(id).level(MATRIX_HEIGHT as u8)
        } else {
            0
        }
    })
}

fn channel_view(ctx: &EngineContext, id: ChannelId) -> ChannelView {
    let ch = ctx.sensors.channel(id);
    ChannelView {
        channel: id,
        value: ch.value(),
        unit: ch.unit(),
        average: ch.moving_average(),
        anomalous: ch.is_anomalous(),
    }
}
