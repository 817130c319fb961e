//! Side button

use debouncr::{debounce_2, Debouncer, Edge, Repeat2};
use embassy_nrf::{
    gpio::{Input, Output},
    peripherals::{P0_13, P0_15},
};
use embassy_time::{Duration, Timer};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct Button {
    /// Button detection pin (high/low)
    pin: Input<'static, P0_13>,
    /// Button enable pin
    enable: Output<'static, P0_15>,
    debouncer: Debouncer<u8, Repeat2>,
}

impl Button {
    /// Configure button on boot
    pub fn init(pin: Input<'static, P0_13>, enable: Output<'static, P0_15>) -> Self {
        Self {
            pin,
            enable,
            debouncer: debounce_2(false),
        }
    }

    /// Poll the button until it is pressed without bouncing for 20 (10 * 2) ms.
    pub async fn wait_for_press(&mut self) {
        loop {
            self.enable.set_high();
            // The button needs a short time to give stable outputs
            Timer::after(Duration::from_nanos(1)).await;
            let edge = self.debouncer.update(self.pin.is_high());

            // Button consumes around 34µA when P0.15 is left high.
            self.enable.set_low();

            if edge == Some(Edge::Rising) {
                return;
            }
            Timer::after(POLL_INTERVAL).await;
        }
    }
}
