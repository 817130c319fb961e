//! Default watchface
//!
//! Animation centered at the top, time below it and the date at the bottom, black on chrome
//! yellow.

use core::fmt;

use chrono::{Datelike, Timelike};
use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    geometry::{Point, Size},
    mono_font::{iso_8859_1::FONT_10X20, MonoFont, MonoTextStyleBuilder},
    pixelcolor::{Rgb565, RgbColor},
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};
use profont::PROFONT_24_POINT;

use super::{Label, WatchFace, WatchFaceState};
use crate::{
    animation::FrameBuffer,
    settings::{ClockStyle, WatchfaceConfig},
};

pub const LCD_W: u32 = 240;
pub const LCD_H: u32 = 240;

/// Chrome yellow
pub const BACKGROUND_COLOR: Rgb565 = Rgb565::new(31, 42, 0);
pub const TEXT_COLOR: Rgb565 = Rgb565::BLACK;

/// Area the animation frames are drawn into
pub const ANIMATION_AREA: Rectangle = Rectangle::new(Point::new(71, 8), Size::new(98, 98));
const TIME_AREA: Rectangle = Rectangle::new(Point::new(0, 114), Size::new(LCD_W, 52));
const DATE_AREA: Rectangle = Rectangle::new(Point::new(0, 176), Size::new(LCD_W, 36));

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Basic default watchface
pub struct DefaultWatchface {
    clock_style: ClockStyle,
    /// Time label
    pub time_label: Label<8>,
    /// Date label
    pub date_label: Label<16>,
}

impl WatchFace for DefaultWatchface {
    fn new(config: &WatchfaceConfig) -> Self {
        Self {
            clock_style: config.clock_style,
            time_label: Label::new("00:00"),
            date_label: Label::new(""),
        }
    }

    fn update(&mut self, state: &WatchFaceState) -> Result<(), fmt::Error> {
        let time = state.time;

        // Update time label
        let hour = match self.clock_style {
            ClockStyle::TwentyFourHour => time.hour(),
            ClockStyle::TwelveHour => time.hour12().1,
        };
        self.time_label
            .set(format_args!("{:02}:{:02}", hour, time.minute()))?;

        // Update date label, day padded with a space like strftime's %e
        self.date_label.set(format_args!(
            "{}, {} {:>2}",
            WEEKDAYS[time.weekday().num_days_from_monday() as usize],
            MONTHS[time.month0() as usize],
            time.day(),
        ))?;

        debug!("watchface text updated");
        Ok(())
    }

    fn draw<D>(
        &self,
        target: &mut D,
        frame: Option<&FrameBuffer<'_, Rgb565>>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(BACKGROUND_COLOR)?;
        self.draw_frame(target, frame)?;
        self.draw_text(target)
    }

    fn draw_frame<D>(
        &self,
        target: &mut D,
        frame: Option<&FrameBuffer<'_, Rgb565>>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match frame {
            Some(frame) => {
                // Larger frames lose their right and bottom edges.
                let mut area = target.clipped(&ANIMATION_AREA);
                frame.draw_at(&mut area, ANIMATION_AREA.top_left)
            }
            None => target.fill_solid(&ANIMATION_AREA, BACKGROUND_COLOR),
        }
    }

    fn draw_text<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_label(target, self.time_label.as_str(), &PROFONT_24_POINT, &TIME_AREA)?;
        draw_label(target, self.date_label.as_str(), &FONT_10X20, &DATE_AREA)
    }
}

/// Clear `area` and draw `text` centered in it
fn draw_label<D>(
    target: &mut D,
    text: &str,
    font: &MonoFont<'_>,
    area: &Rectangle,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.fill_solid(area, BACKGROUND_COLOR)?;

    let character_style = MonoTextStyleBuilder::new()
        .font(font)
        .text_color(TEXT_COLOR)
        .background_color(BACKGROUND_COLOR)
        .build();
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();

    Text::with_text_style(text, area.center(), character_style, text_style).draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use embedded_graphics::{prelude::*, Pixel};

    /// In-memory stand-in for the LCD.
    struct Canvas {
        pixels: Vec<Rgb565>,
    }

    impl Canvas {
        fn new() -> Self {
            Self {
                pixels: vec![Rgb565::WHITE; (LCD_W * LCD_H) as usize],
            }
        }

        fn at(&self, x: i32, y: i32) -> Rgb565 {
            self.pixels[(y * LCD_W as i32 + x) as usize]
        }

        fn count_in(&self, area: &Rectangle, color: Rgb565) -> usize {
            area.points().filter(|p| self.at(p.x, p.y) == color).count()
        }
    }

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size {
            Size::new(LCD_W, LCD_H)
        }
    }

    impl DrawTarget for Canvas {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Rgb565>>,
        {
            for Pixel(p, color) in pixels {
                if self.bounding_box().contains(p) {
                    self.pixels[(p.y * LCD_W as i32 + p.x) as usize] = color;
                }
            }
            Ok(())
        }
    }

    fn face(style: ClockStyle, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DefaultWatchface {
        let config = WatchfaceConfig {
            clock_style: style,
            ..WatchfaceConfig::default()
        };
        let mut face = DefaultWatchface::new(&config);
        let time = NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap();
        face.update(&WatchFaceState { time }).unwrap();
        face
    }

    fn time_text(style: ClockStyle, h: u32, mi: u32) -> String {
        face(style, 2015, 10, 25, h, mi).time_label.as_str().to_owned()
    }

    #[test]
    fn formats_time_in_both_clock_styles() {
        assert_eq!(time_text(ClockStyle::TwentyFourHour, 13, 5), "13:05");
        assert_eq!(time_text(ClockStyle::TwelveHour, 13, 5), "01:05");
        assert_eq!(time_text(ClockStyle::TwelveHour, 0, 30), "12:30");
        assert_eq!(time_text(ClockStyle::TwentyFourHour, 0, 30), "00:30");
    }

    #[test]
    fn formats_date_like_strftime() {
        let face_a = face(ClockStyle::TwentyFourHour, 2015, 10, 25, 8, 0);
        assert_eq!(face_a.date_label.as_str(), "Sun, Oct 25");
        let face_b = face(ClockStyle::TwentyFourHour, 2024, 3, 4, 8, 0);
        assert_eq!(face_b.date_label.as_str(), "Mon, Mar  4");
    }

    #[test]
    fn new_face_shows_placeholder_time() {
        let face = DefaultWatchface::new(&WatchfaceConfig::default());
        assert_eq!(face.time_label.as_str(), "00:00");
        assert_eq!(face.date_label.as_str(), "");
    }

    #[test]
    fn draws_background_frame_and_text() {
        let face = face(ClockStyle::TwentyFourHour, 2015, 10, 25, 13, 5);
        let mut storage = [Rgb565::RED; 98 * 98];
        let frame = FrameBuffer::new(&mut storage, Size::new(98, 98)).unwrap();
        let mut canvas = Canvas::new();

        face.draw(&mut canvas, Some(&frame)).unwrap();

        assert_eq!(canvas.at(0, 0), BACKGROUND_COLOR);
        assert_eq!(canvas.at(239, 239), BACKGROUND_COLOR);
        assert_eq!(canvas.count_in(&ANIMATION_AREA, Rgb565::RED), 98 * 98);
        assert_eq!(canvas.at(70, 8), BACKGROUND_COLOR);
        assert!(canvas.count_in(&TIME_AREA, TEXT_COLOR) > 0);
        assert!(canvas.count_in(&DATE_AREA, TEXT_COLOR) > 0);
    }

    #[test]
    fn missing_frame_falls_back_to_background() {
        let face = face(ClockStyle::TwentyFourHour, 2015, 10, 25, 13, 5);
        let mut canvas = Canvas::new();

        face.draw_frame(&mut canvas, None).unwrap();

        assert_eq!(canvas.count_in(&ANIMATION_AREA, BACKGROUND_COLOR), 98 * 98);
        assert_eq!(canvas.at(0, 0), Rgb565::WHITE);
    }

    #[test]
    fn oversized_frame_is_cropped_to_animation_area() {
        let face = face(ClockStyle::TwentyFourHour, 2015, 10, 25, 13, 5);
        let mut storage = vec![Rgb565::BLUE; 120 * 120];
        let frame = FrameBuffer::new(&mut storage, Size::new(120, 120)).unwrap();
        let mut canvas = Canvas::new();

        face.draw_frame(&mut canvas, Some(&frame)).unwrap();

        assert_eq!(canvas.count_in(&ANIMATION_AREA, Rgb565::BLUE), 98 * 98);
        assert_eq!(canvas.count_in(&canvas.bounding_box(), Rgb565::BLUE), 98 * 98);
    }

    #[test]
    fn text_redraw_leaves_animation_untouched() {
        let face = face(ClockStyle::TwentyFourHour, 2015, 10, 25, 13, 5);
        let mut canvas = Canvas::new();

        face.draw_text(&mut canvas).unwrap();

        assert_eq!(canvas.count_in(&ANIMATION_AREA, Rgb565::WHITE), 98 * 98);
        assert!(canvas.count_in(&TIME_AREA, BACKGROUND_COLOR) > 0);
    }
}
