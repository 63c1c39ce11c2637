//! Status screens on the 128×64 monochrome display.
//!
//! Text and rules are rasterised with `embedded-graphics` into a
//! [`Canvas`] that forwards every pixel to the [`DrawSurface`] port. Each
//! render clears the whole surface, draws the screen and flushes once.
//!
//! ```text
//!  ┌────────────────────────┐   ┌────────────────────────┐
//!  │Env Monitor             │   │*** FIRE ***            │
//!  │────────────────────────│   │────────────────────────│
//!  │Temperature             │   │SOS active              │
//!  │24.8 C                  │   │Press B                 │
//!  │Avg: 25.0 C             │   │to cancel               │
//!  │ALERT!                  │   │                        │
//!  │                    1/3 │   │                        │
//!  └────────────────────────┘   └────────────────────────┘
//! ```

use core::fmt::{self, Write as _};

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use log::warn;

use crate::app::ports::DrawSurface;
use crate::config::Feature;
use crate::error::DeviceError;
use crate::sensors::ChannelId;

pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

/// 21 glyphs of the 6×10 font span the panel, so no drawn line needs
/// more than 32 bytes.
type Line32 = heapless::String<32>;

/// Format one display line. Overflow keeps what fit and is logged.
fn line(args: fmt::Arguments<'_>) -> Line32 {
    let mut out = Line32::new();
    if out.write_fmt(args).is_err() {
        warn!("Display line truncated to '{}'", out);
    }
    out
}

// ---------------------------------------------------------------------------
// Canvas adapter
// ---------------------------------------------------------------------------

/// `DrawTarget` view over a [`DrawSurface`].
pub struct Canvas<'a, S: ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawSurface + ?Sized> Canvas<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        Self { surface }
    }
}

impl<S: DrawSurface + ?Sized> OriginDimensions for Canvas<'_, S> {
    fn size(&self) -> Size {
        let (w, h) = self.surface.size();
        Size::new(w, h)
    }
}

impl<S: DrawSurface + ?Sized> DrawTarget for Canvas<'_, S> {
    type Color = BinaryColor;
    type Error = DeviceError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, colour) in pixels {
            if p.x >= 0 && p.y >= 0 {
                self.surface.set_pixel(p.x as u32, p.y as u32, colour.is_on());
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelView {
    pub channel: ChannelId,
    pub value: f32,
    pub unit: &'static str,
    pub average: f32,
    pub anomalous: bool,
}

/// Start-up screens, in the order they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splash {
    Booting,
    Setup,
    Title,
    /// Framed project banner.
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Splash(Splash),
    /// One start-up menu entry.
    Menu { feature: Feature, enabled: bool },
    Fire,
    Wildlife { label: &'static str },
    /// Every module is switched off.
    NothingActive,
    /// Only alert modules are on; names the one being watched.
    MonitoringOnly { fire: bool },
    Channel(ChannelView),
}

/// Clear, draw `screen`, flush.
pub fn render<S: DrawSurface + ?Sized>(surface: &mut S, screen: &Screen) -> Result<(), DeviceError> {
    let mut canvas = Canvas::new(surface);
    canvas.clear(BinaryColor::Off)?;
    draw_screen(&mut canvas, screen)?;
    canvas.surface.flush()
}

fn draw_screen<D>(target: &mut D, screen: &Screen) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match screen {
        Screen::Splash(Splash::Booting) => {
            text(target, "STARTING", 10, 20)?;
        }
        Screen::Splash(Splash::Setup) => {
            text(target, "INITIAL", 10, 20)?;
            text(target, "SETUP", 25, 30)?;
        }
        Screen::Splash(Splash::Title) => {
            text(target, "Environmental", 10, 20)?;
            text(target, "Monitoring", 25, 30)?;
            text(target, "Starting...", 15, 45)?;
        }
        Screen::Splash(Splash::Banner) => {
            Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(target)?;
            text(target, "EMBARCATECH", 20, 20)?;
        }
        Screen::Menu { feature, enabled } => {
            text(target, "CONFIGURATION", 0, 0)?;
            rule(target, 10)?;
            text(target, feature.label(), 0, 15)?;
            let state = line(format_args!("State: {}", if *enabled { "ON" } else { "OFF" }));
            text(target, &state, 0, 25)?;
            text(target, "A: Toggle", 0, 40)?;
            text(target, "B: Start", 0, 50)?;
        }
        Screen::Fire => {
            text(target, "*** FIRE ***", 0, 0)?;
            rule(target, 10)?;
            text(target, "SOS active", 0, 15)?;
            text(target, "Press B", 0, 25)?;
            text(target, "to cancel", 0, 35)?;
        }
        Screen::Wildlife { label } => {
            text(target, "*** ALERT ***", 0, 0)?;
            rule(target, 10)?;
            text(target, "Animal detected:", 0, 15)?;
            text(target, label, 0, 25)?;
            text(target, "Press any", 0, 40)?;
            text(target, "button to continue", 0, 50)?;
        }
        Screen::NothingActive => {
            text(target, "No sensor", 0, 20)?;
            text(target, "active", 0, 30)?;
        }
        Screen::MonitoringOnly { fire } => {
            text(target, "Monitoring:", 0, 20)?;
            text(target, if *fire { "Fire" } else { "Wildlife" }, 0, 30)?;
        }
        Screen::Channel(view) => {
            text(target, "Env Monitor", 0, 0)?;
            rule(target, 10)?;
            text(target, view.channel.name(), 0, 15)?;

            let value = line(format_args!("{:.1} {}", view.value, view.unit));
            text(target, &value, 0, 25)?;

            let average = line(format_args!("Avg: {:.1} {}", view.average, view.unit));
            text(target, &average, 0, 35)?;

            if view.anomalous {
                text(target, "ALERT!", 0, 45)?;
            }

            let position = line(format_args!("{}/{}", view.channel.index() + 1, ChannelId::COUNT));
            text(target, &position, 100, 55)?;
        }
    }
    Ok(())
}

fn text<D>(target: &mut D, s: &str, x: i32, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(s, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

fn rule<D>(target: &mut D, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Line::new(Point::new(0, y), Point::new(DISPLAY_WIDTH as i32 - 1, y))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)
}
