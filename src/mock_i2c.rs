//! A recording I2C bus for host tests.
//!
//! [`RecordingI2c`] implements the async `embedded-hal` I2C trait and keeps every write it is
//! given. It can be told to fail always or just once, so drivers can be checked byte for byte
//! without hardware.

use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use heapless::Vec;

/// Longest single write kept (an HT16K33 RAM frame is 17 bytes).
pub const MAX_WRITE_LEN: usize = 17;

/// Number of writes kept before the bus reports an overrun.
pub const MAX_WRITES: usize = 32;

type Write = (u8, Vec<u8, MAX_WRITE_LEN>);

/// In-memory I2C bus that records writes.
#[derive(Debug, Default)]
pub struct RecordingI2c {
    writes: Vec<Write, MAX_WRITES>,
    failure: Option<ErrorKind>,
    one_shot: Option<(usize, ErrorKind)>,
}

impl RecordingI2c {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following transaction fail with `kind`.
    pub fn fail_with(&mut self, kind: ErrorKind) {
        self.failure = Some(kind);
    }

    /// Lets `successes` more transactions through, fails the next one with `kind`, then works
    /// again.
    pub fn fail_once_after(&mut self, successes: usize, kind: ErrorKind) {
        self.one_shot = Some((successes, kind));
    }

    /// Makes following transactions succeed again.
    pub fn succeed(&mut self) {
        self.failure = None;
        self.one_shot = None;
    }

    /// Forgets the recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }

    /// The recorded writes as `(address, bytes)`, oldest first.
    pub fn writes(&self) -> impl Iterator<Item = (u8, &[u8])> {
        self.writes
            .iter()
            .map(|(address, bytes)| (*address, bytes.as_slice()))
    }

    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// The most recent write's bytes, if any.
    #[must_use]
    pub fn last_write(&self) -> Option<&[u8]> {
        self.writes.last().map(|(_, bytes)| bytes.as_slice())
    }
}

impl ErrorType for RecordingI2c {
    type Error = ErrorKind;
}

impl embedded_hal_async::i2c::I2c for RecordingI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if let Some(kind) = self.failure {
            return Err(kind);
        }
        if let Some((successes, kind)) = self.one_shot {
            if successes == 0 {
                self.one_shot = None;
                return Err(kind);
            }
            self.one_shot = Some((successes - 1, kind));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let recorded = Vec::from_slice(*bytes).map_err(|()| ErrorKind::Overrun)?;
                    self.writes
                        .push((address, recorded))
                        .map_err(|_| ErrorKind::Overrun)?;
                }
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        Ok(())
    }
}
