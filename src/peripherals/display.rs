//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use embedded_graphics::pixelcolor::Rgb565;
use mipidsi::{models::ST7789, Builder, Orientation};

use animface::{
    ui::default_watchface::{LCD_H, LCD_W},
    FrameBuffer, WatchFace,
};

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

/// ST7789 LCD, 240x240 over SPI
pub struct Display<SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'static, SPI>,
}

impl<SPI> Display<SPI>
where
    SPI: spim::Instance,
{
    /// Initialize the display
    pub fn init(
        spim: Spim<'static, SPI>,
        cs: Output<'static, P0_25>,
        dc: Output<'static, P0_18>,
        rst: Output<'static, P0_26>,
        delay: &mut Delay,
    ) -> Result<Self, DisplayError> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W as u16, LCD_H as u16)
            .with_orientation(Orientation::Portrait(false))
            .init(delay, Some(rst))
            .map_err(|_| DisplayError::Init)?;

        Ok(Self { lcd })
    }

    /// Draw the whole watchface
    pub fn show<F: WatchFace>(
        &mut self,
        face: &F,
        frame: Option<&FrameBuffer<'_, Rgb565>>,
    ) -> Result<(), DisplayError> {
        face.draw(&mut self.lcd, frame)
            .map_err(|_| DisplayError::Interface)
    }

    /// Redraw the animation area only
    pub fn show_frame<F: WatchFace>(
        &mut self,
        face: &F,
        frame: Option<&FrameBuffer<'_, Rgb565>>,
    ) -> Result<(), DisplayError> {
        face.draw_frame(&mut self.lcd, frame)
            .map_err(|_| DisplayError::Interface)
    }

    /// Redraw time and date only
    pub fn show_text<F: WatchFace>(&mut self, face: &F) -> Result<(), DisplayError> {
        face.draw_text(&mut self.lcd)
            .map_err(|_| DisplayError::Interface)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format, thiserror::Error)]
pub enum DisplayError {
    #[error("LCD controller did not respond to init")]
    Init,
    #[error("SPI transfer to the LCD failed")]
    Interface,
}
