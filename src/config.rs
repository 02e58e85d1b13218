//! Build-time display settings.
//!
//! `build.rs` reads `SEG7_I2C_ADDRESS`, `SEG7_BRIGHTNESS` and `SEG7_BLINK` from the
//! environment (or a `.env` file) and bakes them into the binary. Unset values fall back to
//! `0x70`, `15` and `off`.

use crate::ht16k33::{BASE_ADDRESS, BlinkRate, Brightness};
use crate::{Error, Result};

/// Settings applied when a display starts.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seg7Config {
    pub address: u8,
    pub brightness: Brightness,
    pub blink_rate: BlinkRate,
}

impl Default for Seg7Config {
    fn default() -> Self {
        Self {
            address: BASE_ADDRESS,
            brightness: Brightness::MAX,
            blink_rate: BlinkRate::Off,
        }
    }
}

impl Seg7Config {
    /// The settings captured by `build.rs`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first variable that does not parse.
    pub fn from_build_env() -> Result<Self> {
        Self::parse(
            env!("SEG7_I2C_ADDRESS"),
            env!("SEG7_BRIGHTNESS"),
            env!("SEG7_BLINK"),
        )
    }

    /// Parses settings from their text forms.
    ///
    /// The address may be decimal or `0x`-prefixed hex. The blink rate is one of `off`, `2hz`,
    /// `1hz` or `0.5hz` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first value that does not parse, or the
    /// range errors of [`Brightness::new`].
    pub fn parse(address: &str, brightness: &str, blink_rate: &str) -> Result<Self> {
        Ok(Self {
            address: parse_address(address.trim())?,
            brightness: Brightness::new(
                brightness
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidConfig("SEG7_BRIGHTNESS"))?,
            )?,
            blink_rate: parse_blink_rate(blink_rate.trim())?,
        })
    }
}

fn parse_address(text: &str) -> Result<u8> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|_| Error::InvalidConfig("SEG7_I2C_ADDRESS"))
}

fn parse_blink_rate(text: &str) -> Result<BlinkRate> {
    const NAMES: [(&str, BlinkRate); 4] = [
        ("off", BlinkRate::Off),
        ("2hz", BlinkRate::TwoHz),
        ("1hz", BlinkRate::OneHz),
        ("0.5hz", BlinkRate::HalfHz),
    ];
    NAMES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
        .map(|&(_, blink_rate)| blink_rate)
        .ok_or(Error::InvalidConfig("SEG7_BLINK"))
}
