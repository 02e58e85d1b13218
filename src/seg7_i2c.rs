//! A device abstraction for an HT16K33 7-segment display that runs in its own task.
//!
//! See [`Seg7I2c`] for usage.

use defmt::{Display2Format, info, warn};
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, Config as I2cConfig, InterruptHandler, SclPin, SdaPin};
use embassy_rp::peripherals::I2C0;
use embassy_rp::{Peri, bind_interrupts};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};

use crate::Result;
use crate::bit_matrix_seg7::Base;
use crate::config::Seg7Config;
use crate::ht16k33::{BlinkRate, Brightness};
use crate::seg7_command::Seg7Command;
use crate::seg7_display::Seg7Display;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => InterruptHandler<I2C0>;
});

// Hardcode to I2C0 to avoid generics in the task
type Seg7Bus = i2c::I2c<'static, I2C0, i2c::Async>;

/// Commands waiting for the display task.
const COMMAND_CAPACITY: usize = 4;

/// HT16K33 runs its bus at up to 400 kHz.
const I2C_FREQUENCY_HZ: u32 = 400_000;

type Seg7Commands = Channel<CriticalSectionRawMutex, Seg7Command, COMMAND_CAPACITY>;

/// Static for the [`Seg7I2c`] device.
pub struct Seg7I2cStatic(Seg7Commands);

impl Seg7I2cStatic {
    #[must_use]
    pub const fn new() -> Self {
        Self(Channel::new())
    }
}

impl Default for Seg7I2cStatic {
    fn default() -> Self {
        Self::new()
    }
}

/// A 4-digit 7-segment HT16K33 backpack on `I2C0`, driven by a background task.
///
/// Methods queue a [`Seg7Command`] and return at once; the task does the bus work and logs
/// any error.
///
/// # Example
///
/// ```no_run
/// # #![no_std]
/// # #![no_main]
/// use seg7_kit::{Seg7Config, Seg7I2c, Seg7I2cStatic};
/// # #[panic_handler]
/// # fn panic(_info: &core::panic::PanicInfo) -> ! { loop {} }
///
/// async fn example(p: embassy_rp::Peripherals, spawner: embassy_executor::Spawner) -> seg7_kit::Result<()> {
///     static SEG7_I2C_STATIC: Seg7I2cStatic = Seg7I2c::new_static();
///     let config = Seg7Config::from_build_env()?;
///     let display = Seg7I2c::new(&SEG7_I2C_STATIC, p.I2C0, p.PIN_5, p.PIN_4, config, spawner)?;
///
///     display.write_text("HEL0")?;
///     display.write_time(12, 34);
///     Ok(())
/// }
/// ```
pub struct Seg7I2c<'a>(&'a Seg7Commands);

impl Seg7I2c<'_> {
    /// Creates static channel resources for the display.
    #[must_use]
    pub const fn new_static() -> Seg7I2cStatic {
        Seg7I2cStatic::new()
    }

    /// Creates the display device and spawns its background task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the configured address is not an HT16K33 address,
    /// or [`Error::TaskSpawn`] if the task cannot be spawned.
    pub fn new(
        seg7_i2c_static: &'static Seg7I2cStatic,
        i2c_peripheral: Peri<'static, I2C0>,
        scl: Peri<'static, impl SclPin<I2C0> + 'static>,
        sda: Peri<'static, impl SdaPin<I2C0> + 'static>,
        config: Seg7Config,
        spawner: Spawner,
    ) -> Result<Self> {
        let mut i2c_config = I2cConfig::default();
        i2c_config.frequency = I2C_FREQUENCY_HZ;
        let i2c = i2c::I2c::new_async(i2c_peripheral, scl, sda, Irqs, i2c_config);
        let display = Seg7Display::new(i2c, config.address)?;
        let token = device_loop(display, config, &seg7_i2c_static.0)?;
        spawner.spawn(token);
        Ok(Self(&seg7_i2c_static.0))
    }

    /// Queues a command without waiting. If the queue is full the command is dropped.
    pub fn send(&self, command: Seg7Command) {
        if self.0.try_send(command).is_err() {
            info!("Seg7 channel full, command dropped");
        }
    }

    /// Queues a command, waiting for room.
    pub async fn send_await(&self, command: Seg7Command) {
        self.0.send(command).await;
    }

    /// Shows text until the next command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLong`](crate::Error::TextTooLong) if the text needs more than
    /// four cells or [`TEXT_CAPACITY`](crate::seg7_command::TEXT_CAPACITY) bytes.
    pub fn write_text(&self, text: &str) -> Result<()> {
        self.write_text_for(text, Duration::from_ticks(0))
    }

    /// Shows text and keeps it up for at least `hold`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLong`](crate::Error::TextTooLong) if the text needs more than
    /// four cells or [`TEXT_CAPACITY`](crate::seg7_command::TEXT_CAPACITY) bytes. Nothing is
    /// queued then.
    pub fn write_text_for(&self, text: &str, hold: Duration) -> Result<()> {
        self.send(Seg7Command::text(text, hold)?);
        Ok(())
    }

    pub fn write_number(&self, value: i32) {
        self.send(Seg7Command::Number {
            value,
            base: Base::Decimal,
            hold: Duration::from_ticks(0),
        });
    }

    pub fn write_float(&self, value: f32, fraction_digits: u8) {
        self.send(Seg7Command::Float {
            value,
            fraction_digits,
            hold: Duration::from_ticks(0),
        });
    }

    /// Shows `HH:MM` with the colon lit.
    pub fn write_time(&self, hours: u8, minutes: u8) {
        self.send(Seg7Command::Time { hours, minutes });
    }

    pub fn set_colon(&self, on: bool) {
        self.send(Seg7Command::Colon(on));
    }

    pub fn set_brightness(&self, brightness: Brightness) {
        self.send(Seg7Command::Brightness(brightness));
    }

    pub fn set_blink_rate(&self, blink_rate: BlinkRate) {
        self.send(Seg7Command::Blink(blink_rate));
    }

    pub fn set_display_on(&self, on: bool) {
        self.send(Seg7Command::DisplayOn(on));
    }

    pub fn clear(&self) {
        self.send(Seg7Command::Clear);
    }
}

#[embassy_executor::task]
async fn device_loop(
    mut display: Seg7Display<Seg7Bus>,
    config: Seg7Config,
    commands: &'static Seg7Commands,
) -> ! {
    match display.begin_with(config).await {
        Ok(()) => info!("Seg7 display ready at {=u8:#x}", display.address()),
        Err(err) => warn!("Seg7 display start failed: {}", Display2Format(&err)),
    }

    loop {
        let command = commands.receive().await;
        let hold = command.hold();
        if let Err(err) = display.apply(command).await {
            warn!("Seg7 command failed: {}", Display2Format(&err));
        }
        if hold > Duration::from_ticks(0) {
            Timer::after(hold).await;
        }
    }
}
