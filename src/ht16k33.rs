//! Command framing for the HT16K33 LED controller.
//!
//! The controller takes single-byte commands for setup, dimming and blinking, and a
//! display-RAM write of up to 16 bytes (eight 16-bit rows) starting at RAM address 0.
//!
//! See [`Ht16k33`] for the bus-level driver.

#[cfg(feature = "display-trace")]
use defmt::info;
use embedded_hal_async::i2c::I2c;

use crate::{Error, Result};

/// Number of 16-bit rows in display RAM.
pub const RAM_ROW_COUNT: usize = 8;

/// Display RAM contents, one `u16` per row (common line).
pub type DisplayRam = [u16; RAM_ROW_COUNT];

/// Lowest I2C address selectable with the A0-A2 jumpers.
pub const BASE_ADDRESS: u8 = 0x70;

/// Highest I2C address selectable with the A0-A2 jumpers.
pub const MAX_ADDRESS: u8 = 0x77;

pub mod command {
    /// Display RAM starts at address 0; the address pointer auto-increments.
    pub const DISPLAY_RAM: u8 = 0x00;
    /// System setup; bit 0 turns the internal oscillator on.
    pub const SYSTEM_SETUP: u8 = 0x20;
    /// Display setup; bit 0 is display on, bits 1-2 are the blink rate.
    pub const DISPLAY_SETUP: u8 = 0x80;
    /// Dimming set; bits 0-3 are the duty cycle in sixteenths.
    pub const DIMMING: u8 = 0xE0;

    pub mod system_setup {
        pub const OSCILLATOR_OFF: u8 = 0x00; // standby
        pub const OSCILLATOR_ON: u8 = 0x01; // normal operation
    }

    pub mod display_setup {
        pub const DISPLAY_OFF: u8 = 0x00;
        pub const DISPLAY_ON: u8 = 0x01;
        pub const BLINK_SHIFT: u8 = 1;
    }
}

/// Hardware blink rate of the whole display.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkRate {
    #[default]
    Off,
    TwoHz,
    OneHz,
    HalfHz,
}

impl BlinkRate {
    /// The two-bit code placed in the display setup command.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::TwoHz => 1,
            Self::OneHz => 2,
            Self::HalfHz => 3,
        }
    }
}

/// Display brightness as a dimming level, 0 (dimmest, not off) through 15 (full duty).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Brightness(u8);

impl Brightness {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(15);

    /// # Errors
    ///
    /// Returns [`Error::BrightnessOutOfRange`] if `level > 15`.
    pub const fn new(level: u8) -> Result<Self> {
        if level > Self::MAX.0 {
            Err(Error::BrightnessOutOfRange(level))
        } else {
            Ok(Self(level))
        }
    }

    /// Clamps `level` to the valid range.
    #[must_use]
    pub const fn saturating(level: u8) -> Self {
        if level > Self::MAX.0 {
            Self::MAX
        } else {
            Self(level)
        }
    }

    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

/// Builds the system setup command byte.
#[must_use]
pub const fn system_setup_command(oscillator_on: bool) -> u8 {
    command::SYSTEM_SETUP
        | if oscillator_on {
            command::system_setup::OSCILLATOR_ON
        } else {
            command::system_setup::OSCILLATOR_OFF
        }
}

/// Builds the display setup command byte.
#[must_use]
pub const fn display_setup_command(display_on: bool, blink_rate: BlinkRate) -> u8 {
    let on = if display_on {
        command::display_setup::DISPLAY_ON
    } else {
        command::display_setup::DISPLAY_OFF
    };
    command::DISPLAY_SETUP | (blink_rate.code() << command::display_setup::BLINK_SHIFT) | on
}

/// Builds the dimming command byte.
#[must_use]
pub const fn dimming_command(brightness: Brightness) -> u8 {
    command::DIMMING | brightness.level()
}

/// Frames a display RAM write: the RAM address, then each row low byte first.
#[must_use]
pub fn ram_write_frame(ram: &DisplayRam) -> [u8; 1 + 2 * RAM_ROW_COUNT] {
    let mut frame = [0; 1 + 2 * RAM_ROW_COUNT];
    let (address, rows) = frame.split_at_mut(1);
    if let Some(first) = address.first_mut() {
        *first = command::DISPLAY_RAM;
    }
    for (pair, row) in rows.chunks_exact_mut(2).zip(ram) {
        pair.copy_from_slice(&row.to_le_bytes());
    }
    frame
}

/// HT16K33 controller on an async I2C bus.
///
/// Each method is one I2C write transaction. Construction does no I/O.
pub struct Ht16k33<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ht16k33<I2C> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `address` is outside `0x70..=0x77`.
    pub fn new(i2c: I2C, address: u8) -> Result<Self> {
        if !(BASE_ADDRESS..=MAX_ADDRESS).contains(&address) {
            return Err(Error::InvalidAddress(address));
        }
        Ok(Self { i2c, address })
    }

    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Starts or stops the internal oscillator. Stopped is the low-power standby state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn set_oscillator(&mut self, on: bool) -> Result<()> {
        self.write_command(system_setup_command(on)).await
    }

    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn set_display(&mut self, on: bool, blink_rate: BlinkRate) -> Result<()> {
        self.write_command(display_setup_command(on, blink_rate))
            .await
    }

    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
        self.write_command(dimming_command(brightness)).await
    }

    /// Writes all of display RAM in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::I2c`] if the bus write fails.
    pub async fn write_ram(&mut self, ram: &DisplayRam) -> Result<()> {
        #[cfg(feature = "display-trace")]
        info!("ht16k33 {=u8:#x} ram: {:?}", self.address, ram);
        self.i2c
            .write(self.address, &ram_write_frame(ram))
            .await
            .map_err(Error::i2c)
    }

    /// Gives back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn write_command(&mut self, command: u8) -> Result<()> {
        #[cfg(feature = "display-trace")]
        info!("ht16k33 {=u8:#x} command: {=u8:#x}", self.address, command);
        self.i2c
            .write(self.address, &[command])
            .await
            .map_err(Error::i2c)
    }
}
