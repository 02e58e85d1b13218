use derive_more::derive::{Display, Error};
use embedded_hal::i2c::ErrorKind;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    #[cfg(any(feature = "pico1", feature = "pico2"))]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    // The bus driver's own error type is generic, so only its portable kind is kept.
    #[display("I2C transfer failed: {_0:?}")]
    I2c(#[error(not(source))] ErrorKind),

    #[display("Index out of bounds")]
    IndexOutOfBounds,

    #[display("Digit {_0} is out of range for the base")]
    DigitOutOfRange(#[error(not(source))] u8),

    #[display("Brightness {_0} is out of range (0-15)")]
    BrightnessOutOfRange(#[error(not(source))] u8),

    #[display("I2C address {_0:#04x} is not an HT16K33 address (0x70-0x77)")]
    InvalidAddress(#[error(not(source))] u8),

    #[display("Number does not fit on the display")]
    NumberOverflow,

    #[display("Text needs more than four cells")]
    TextTooLong,

    #[display("Invalid time {_0:02}:{_1:02}")]
    InvalidTime(#[error(not(source))] u8, #[error(not(source))] u8),

    #[display("Invalid configuration value for {_0}")]
    InvalidConfig(#[error(not(source))] &'static str),
}

impl Error {
    /// Converts any `embedded-hal` I2C error into [`Error::I2c`].
    ///
    /// Use with `map_err` on bus calls; a blanket `From` impl would collide with the other
    /// conversions.
    pub fn i2c<E: embedded_hal::i2c::Error>(err: E) -> Self {
        Self::I2c(err.kind())
    }
}

#[cfg(any(feature = "pico1", feature = "pico2"))]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}
