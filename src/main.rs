#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select3, Either3};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Delay, Duration, Instant, Timer};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use animface::{
    clock::{ms_until_next_minute, TimeReference},
    ui::default_watchface::{ANIMATION_AREA, BACKGROUND_COLOR},
    AnimationError, DefaultWatchface, FireOutcome, FrameAnimator, FrameSequence, TimeManager,
    WatchFace, WatchFaceState, WatchfaceConfig,
};
use peripherals::{backlight::Backlight, button::Button, display::Display};
use system::{
    config::SystemConfig,
    resources::{RESOURCES, RESOURCE_ID_ANIMATION},
    timer::TimerQueue,
};

// Others
use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::pixelcolor::Rgb565;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

const FRAME_PIXELS: usize = (ANIMATION_AREA.size.width * ANIMATION_AREA.size.height) as usize;

type Animator = FrameAnimator<'static, FrameSequence<'static>, TimerQueue, fn(AnimationError)>;

// Communication channels
static REPLAY: Signal<ThreadModeRawMutex, ()> = Signal::new();
static TIME: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();

static FRAME_STORAGE: StaticCell<[Rgb565; FRAME_PIXELS]> = StaticCell::new();

fn report_animation_error(err: AnimationError) {
    defmt::error!("Animation error: {}", err);
}

/// Polls the button, a press replays the animation
#[embassy_executor::task(pool_size = 1)]
async fn poll_button(mut button: Button) {
    loop {
        button.wait_for_press().await;
        defmt::info!("Button pressed");
        REPLAY.signal(());
    }
}

/// Publish the local time at every full minute
#[embassy_executor::task(pool_size = 1)]
async fn update_time(clock: TimeManager) {
    loop {
        let now = clock.get_time(Instant::now().as_millis());
        defmt::info!("Current time: {}:{}", now.hour(), now.minute());
        TIME.signal(now);

        // Re-schedule at the start of the next minute
        Timer::after(Duration::from_millis(ms_until_next_minute(now).into())).await;
    }
}

/// Draws the watchface and advances the animation on its timers
#[embassy_executor::task(pool_size = 1)]
async fn run_watchface(
    mut display: Display<SPI2>,
    backlight: Backlight,
    mut face: DefaultWatchface,
    mut animator: Animator,
) {
    if let Err(err) = display.show(&face, animator.frame()) {
        defmt::warn!("Display update failed: {}", err);
    }
    defmt::info!("Backlight at level {}", backlight.get_brightness());

    loop {
        let deadline = animator.scheduler().next_deadline();
        let frame_due = async {
            match deadline {
                Some(at) => Timer::at(at).await,
                None => core::future::pending().await,
            }
        };

        let result = match select3(TIME.wait(), REPLAY.wait(), frame_due).await {
            Either3::First(time) => {
                if face.update(&WatchFaceState { time }).is_err() {
                    defmt::warn!("Time does not fit its label");
                }
                display.show_text(&face)
            }
            Either3::Second(()) => {
                if let Err(err) = animator.replay() {
                    defmt::info!("Nothing to replay: {}", err);
                }
                Ok(())
            }
            Either3::Third(()) => {
                let Some(handle) = animator.scheduler_mut().take_due(Instant::now()) else {
                    continue;
                };
                match animator.on_timer_fire(handle) {
                    FireOutcome::FrameReady => match animator.frame_mut() {
                        Some(frame) if frame.is_dirty() => {
                            frame.take_dirty();
                            display.show_frame(&face, Some(&*frame))
                        }
                        _ => Ok(()),
                    },
                    // Show the background instead of a half decoded frame
                    FireOutcome::Failed => display.show_frame(&face, None),
                    FireOutcome::Finished | FireOutcome::Ignored => Ok(()),
                }
            }
        };

        if let Err(err) = result {
            defmt::warn!("Display update failed: {}", err);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    let config = WatchfaceConfig::from_build_env(
        option_env!("ANIMFACE_UTC_OFFSET"),
        option_env!("ANIMFACE_CLOCK"),
        option_env!("ANIMFACE_BACKLIGHT"),
    )
    .unwrap_or_else(|err| {
        defmt::warn!("Invalid build configuration ({}), using defaults", err);
        WatchfaceConfig::default()
    });

    // Start the clock at the build time
    let reference =
        TimeReference::from_epoch(UTC_TIME, config.utc_offset_secs, Instant::now().as_millis())
            .unwrap_or_default();
    let clock = TimeManager::init(reference);

    // Initialize Backlight, off until the LCD shows something
    let mut backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        0,
    ));

    // Initialize Button
    let button = Button::init(
        Input::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        &mut Delay,
    ));

    // Load the watchface
    let mut face = DefaultWatchface::new(&config);
    let time = clock.get_time(Instant::now().as_millis());
    if face.update(&WatchFaceState { time }).is_err() {
        defmt::warn!("Time does not fit its label");
    }

    let storage = FRAME_STORAGE.init([BACKGROUND_COLOR; FRAME_PIXELS]);
    let mut animator: Animator = FrameAnimator::new(TimerQueue::new(), report_animation_error);
    if let Err(err) = animator.load(&RESOURCES, RESOURCE_ID_ANIMATION, storage) {
        defmt::error!("Animation unavailable: {}", err);
    }

    unwrap!(backlight.set(config.backlight));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(poll_button(button)));
    unwrap!(spawner.spawn(update_time(clock)));
    unwrap!(spawner.spawn(run_watchface(display, backlight, face, animator)));
}
