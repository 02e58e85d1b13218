//! Requests for a display driven from a task, and how a [`Seg7Display`] carries them out.
//!
//! The Pico's `Seg7I2c` queues these for its background task. Any other task owning a
//! [`Seg7Display`] can feed them to [`Seg7Display::apply`] the same way.

use embassy_time::Duration;
use embedded_hal_async::i2c::I2c;
use heapless::String;

use crate::bit_matrix_seg7::{Base, BitMatrixSeg7};
use crate::config::Seg7Config;
use crate::ht16k33::{BlinkRate, Brightness};
use crate::seg7_display::Seg7Display;
use crate::{Error, Result};

/// Four glyphs plus a decimal point after each.
pub const TEXT_CAPACITY: usize = 8;

/// A request for a display task. `hold` keeps the result on screen at least that long before
/// the next command is taken.
#[derive(Clone, Debug)]
pub enum Seg7Command {
    Text {
        text: String<TEXT_CAPACITY>,
        hold: Duration,
    },
    Number {
        value: i32,
        base: Base,
        hold: Duration,
    },
    Float {
        value: f32,
        fraction_digits: u8,
        hold: Duration,
    },
    Time {
        hours: u8,
        minutes: u8,
    },
    Colon(bool),
    Brightness(Brightness),
    Blink(BlinkRate),
    DisplayOn(bool),
    Clear,
}

impl Seg7Command {
    /// A text command, checked up front to fit the four cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLong`] if the text needs more than four cells or more than
    /// [`TEXT_CAPACITY`] bytes.
    pub fn text(text: &str, hold: Duration) -> Result<Self> {
        BitMatrixSeg7::from_text(text)?;
        let text = String::try_from(text).map_err(|()| Error::TextTooLong)?;
        Ok(Self::Text { text, hold })
    }

    /// How long the result stays up before the next command. Only text, numbers and floats
    /// hold.
    #[must_use]
    pub const fn hold(&self) -> Duration {
        match self {
            Self::Text { hold, .. } | Self::Number { hold, .. } | Self::Float { hold, .. } => {
                *hold
            }
            _ => Duration::from_ticks(0),
        }
    }
}

impl<I2C: I2c> Seg7Display<I2C> {
    /// [`begin`](Self::begin), then applies the configured brightness and blink rate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::I2c`] if any bus write fails.
    pub async fn begin_with(&mut self, config: Seg7Config) -> Result<()> {
        self.begin().await?;
        self.set_brightness(config.brightness).await?;
        self.set_blink_rate(config.blink_rate).await
    }

    /// Carries out one command.
    ///
    /// Digit and colon commands update the buffer and flush it, even when formatting fails, so
    /// an overflow still shows `----`. Brightness, blink and on/off commands are single
    /// controller writes with no RAM flush.
    ///
    /// # Errors
    ///
    /// Returns the formatting error of the command, or [`Error::I2c`] if a bus write fails.
    pub async fn apply(&mut self, command: Seg7Command) -> Result<()> {
        let formatted = match command {
            Seg7Command::Text { text, .. } => self.write_text(&text),
            Seg7Command::Number { value, base, .. } => self.write_number_base(value, base),
            Seg7Command::Float {
                value,
                fraction_digits,
                ..
            } => self.write_float(value, fraction_digits),
            Seg7Command::Time { hours, minutes } => self.write_time(hours, minutes),
            Seg7Command::Colon(on) => {
                self.set_colon(on);
                Ok(())
            }
            Seg7Command::Clear => {
                self.clear();
                Ok(())
            }
            Seg7Command::Brightness(brightness) => return self.set_brightness(brightness).await,
            Seg7Command::Blink(blink_rate) => return self.set_blink_rate(blink_rate).await,
            Seg7Command::DisplayOn(on) => return self.set_display_on(on).await,
        };
        self.flush().await?;
        formatted
    }
}

#[cfg(all(test, not(target_os = "none")))]
mod tests {
    use embassy_futures::block_on;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    use super::*;
    use crate::ht16k33::ram_write_frame;
    use crate::mock_i2c::RecordingI2c;

    const NONE: Duration = Duration::from_ticks(0);
    const NO_ACK: ErrorKind = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);

    /// Byte of the RAM frame holding the colon row.
    const COLON_BYTE: usize = 5;

    fn started(i2c: RecordingI2c) -> Seg7Display<RecordingI2c> {
        let mut display = Seg7Display::new(i2c, 0x70).expect("valid address");
        block_on(display.begin()).expect("bus ok");
        display
    }

    fn number(value: i32) -> Seg7Command {
        Seg7Command::Number {
            value,
            base: Base::Decimal,
            hold: NONE,
        }
    }

    #[test]
    fn test_hold_applies_to_digit_commands_only() {
        let second = Duration::from_secs(1);
        let text = Seg7Command::text("on", second).expect("fits");
        assert_eq!(text.hold(), second);
        let float = Seg7Command::Float {
            value: 1.5,
            fraction_digits: 1,
            hold: second,
        };
        assert_eq!(float.hold(), second);
        assert_eq!(
            Seg7Command::Number {
                value: 7,
                base: Base::Hex,
                hold: second
            }
            .hold(),
            second
        );
        for command in [
            Seg7Command::Time {
                hours: 1,
                minutes: 2,
            },
            Seg7Command::Colon(true),
            Seg7Command::Brightness(Brightness::MAX),
            Seg7Command::Blink(BlinkRate::OneHz),
            Seg7Command::DisplayOn(false),
            Seg7Command::Clear,
        ] {
            assert_eq!(command.hold(), NONE);
        }
    }

    #[test]
    fn test_text_command_checks_cells() {
        assert!(Seg7Command::text("12.34", NONE).is_ok());
        assert!(Seg7Command::text("8.8.8.8.", NONE).is_ok());
        assert!(matches!(
            Seg7Command::text("HELLO", NONE),
            Err(Error::TextTooLong)
        ));
        assert!(matches!(
            Seg7Command::text("8.8.8.8.8", NONE),
            Err(Error::TextTooLong)
        ));
    }

    #[test]
    fn test_number_after_time_turns_colon_off() {
        let mut display = started(RecordingI2c::new());
        block_on(async {
            display
                .apply(Seg7Command::Time {
                    hours: 12,
                    minutes: 34,
                })
                .await
                .expect("valid time");
            display.apply(number(5678)).await.expect("fits");
        });
        assert!(!display.colon());
        let expected = ram_write_frame(&display.display_ram());
        let i2c = display.release();
        let frames: heapless::Vec<&[u8], 8> = i2c.writes().map(|(_, bytes)| bytes).collect();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[4][COLON_BYTE], 0x02);
        assert_eq!(frames[5][COLON_BYTE], 0x00);
        assert_eq!(frames[5], &expected[..]);
    }

    #[test]
    fn test_overflow_still_flushes_dashes() {
        let mut display = started(RecordingI2c::new());
        let result = block_on(display.apply(number(123_456)));
        assert!(matches!(result, Err(Error::NumberOverflow)));
        let expected = ram_write_frame(&[0x40, 0x40, 0x00, 0x40, 0x40, 0, 0, 0]);
        let i2c = display.release();
        assert_eq!(i2c.write_count(), 5);
        assert_eq!(i2c.last_write(), Some(&expected[..]));
    }

    #[test]
    fn test_control_commands_skip_ram_flush() {
        let mut display = started(RecordingI2c::new());
        block_on(async {
            display
                .apply(Seg7Command::Brightness(Brightness::saturating(5)))
                .await
                .expect("bus ok");
            display
                .apply(Seg7Command::Blink(BlinkRate::TwoHz))
                .await
                .expect("bus ok");
            display
                .apply(Seg7Command::DisplayOn(false))
                .await
                .expect("bus ok");
        });
        assert!(!display.is_display_on());
        let i2c = display.release();
        let writes: heapless::Vec<&[u8], 8> =
            i2c.writes().skip(4).map(|(_, bytes)| bytes).collect();
        assert_eq!(
            writes.as_slice(),
            &[&[0xE5_u8][..], &[0x83][..], &[0x82][..]]
        );
    }

    #[test]
    fn test_display_keeps_working_after_failed_command() {
        let mut i2c = RecordingI2c::new();
        i2c.fail_once_after(4, NO_ACK);
        let mut display = started(i2c);

        let failed = block_on(display.apply(number(1)));
        assert!(matches!(failed, Err(Error::I2c(ErrorKind::NoAcknowledge(_)))));

        block_on(display.apply(number(2))).expect("bus recovered");
        let expected = ram_write_frame(&[0, 0, 0, 0, 0x5B, 0, 0, 0]);
        let i2c = display.release();
        assert_eq!(i2c.write_count(), 5);
        assert_eq!(i2c.last_write(), Some(&expected[..]));
    }

    #[test]
    fn test_begin_with_applies_config() {
        let config = Seg7Config::parse("0x70", "2", "2hz").expect("valid config");
        let mut display = Seg7Display::new(RecordingI2c::new(), config.address).expect("valid");
        block_on(display.begin_with(config)).expect("bus ok");
        assert_eq!(display.blink_rate(), BlinkRate::TwoHz);
        let i2c = display.release();
        let writes: heapless::Vec<&[u8], 8> =
            i2c.writes().skip(4).map(|(_, bytes)| bytes).collect();
        assert_eq!(writes.as_slice(), &[&[0xE2_u8][..], &[0x83][..]]);
    }
}
