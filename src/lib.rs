//! Drivers for 4-digit 7-segment LED displays on an HT16K33 I2C backpack.
//!
//! [`Seg7Display`] works with any async `embedded-hal` I2C bus. On the Raspberry Pi Pico,
//! [`Seg7I2c`] runs a display in its own embassy task.
#![no_std]

pub mod bit_matrix_seg7;
pub mod config;
mod error;
pub mod font;
pub mod ht16k33;
#[cfg(any(test, feature = "host"))]
pub mod mock_i2c;
pub mod seg7_command;
pub mod seg7_display;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod seg7_i2c;

// Re-export commonly used items
pub use bit_matrix_seg7::{Base, BitMatrixSeg7, CELL_COUNT};
pub use config::Seg7Config;
pub use error::{Error, Result};
pub use font::SEVEN_SEG_FONT_TABLE;
pub use ht16k33::{BlinkRate, Brightness};
pub use seg7_command::Seg7Command;
pub use seg7_display::Seg7Display;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use seg7_i2c::{Seg7I2c, Seg7I2cStatic};
