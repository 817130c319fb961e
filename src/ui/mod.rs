//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use core::fmt;

use chrono::NaiveDateTime;
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};

use crate::{animation::FrameBuffer, settings::WatchfaceConfig};

pub mod default_watchface;

pub trait WatchFace: Sized {
    /// Create new watchface
    fn new(config: &WatchfaceConfig) -> Self;

    /// Update watchface with state
    fn update(&mut self, state: &WatchFaceState) -> Result<(), fmt::Error>;

    /// Draw the whole face, `frame` goes into the animation area
    fn draw<D>(&self, target: &mut D, frame: Option<&FrameBuffer<'_, Rgb565>>) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    /// Redraw only the animation area
    fn draw_frame<D>(
        &self,
        target: &mut D,
        frame: Option<&FrameBuffer<'_, Rgb565>>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    /// Redraw only the time and date
    fn draw_text<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// State for the watch face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchFaceState {
    pub time: NaiveDateTime,
}

/// Text of a label, formatted into a fixed buffer
#[derive(Debug, Clone)]
pub struct Label<const N: usize> {
    str_buf: [u8; N],
    len: usize,
}

impl<const N: usize> Label<N> {
    /// Create new label
    pub fn new(text: &str) -> Self {
        let mut label = Self {
            str_buf: [0; N],
            len: 0,
        };
        label.set(format_args!("{}", text)).ok();
        label
    }

    /// Replace the text, fails if it does not fit
    pub fn set(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        self.len = 0;
        self.len = format_no_std::show(&mut self.str_buf, args)?.len();
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or_default()
    }
}
