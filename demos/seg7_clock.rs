//! Uptime clock on an HT16K33 7-segment backpack, driving `Seg7Display` directly on I2C1
//! (SCL = GP3, SDA = GP2).
//!
//! Shows `MM:SS` with the colon blinking once a second.
#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, InterruptHandler};
use embassy_rp::peripherals::I2C1;
use embassy_time::{Instant, Timer};
use panic_probe as _;
use seg7_kit::{Result, Seg7Config, Seg7Display};

bind_interrupts!(struct Irqs {
    I2C1_IRQ => InterruptHandler<I2C1>;
});

#[embassy_executor::main]
pub async fn main(_spawner: Spawner) -> ! {
    let err = inner_main().await.unwrap_err();
    core::panic!("{err}");
}

async fn inner_main() -> Result<core::convert::Infallible> {
    info!("Starting 7-segment uptime clock");
    let p = embassy_rp::init(Default::default());

    let config = Seg7Config::from_build_env()?;
    let i2c = i2c::I2c::new_async(p.I2C1, p.PIN_3, p.PIN_2, Irqs, i2c::Config::default());
    let mut display = Seg7Display::new(i2c, config.address)?;
    display.begin_with(config).await?;

    loop {
        let seconds = Instant::now().as_secs();
        let minutes = u8::try_from((seconds / 60) % 60).unwrap_or_default();
        let second = u8::try_from(seconds % 60).unwrap_or_default();

        // Minutes sit in the hours slot.
        display.write_time(minutes, second)?;
        display.set_colon(seconds % 2 == 0);
        if let Err(err) = display.flush().await {
            warn!("flush failed: {}", defmt::Display2Format(&err));
        }
        Timer::after_millis(250).await;
    }
}
