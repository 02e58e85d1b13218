//! Counts up on an HT16K33 7-segment backpack wired to I2C0 (SCL = GP5, SDA = GP4).
//!
//! Every tenth count is shown in hex and held for a second. Past 9999 the display shows `----`.
#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use panic_probe as _;
use seg7_kit::{Base, Result, Seg7Command, Seg7Config, Seg7I2c, Seg7I2cStatic};

const STEP: Duration = Duration::from_millis(100);
const HEX_HOLD: Duration = Duration::from_secs(1);

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<core::convert::Infallible> {
    info!("Starting 7-segment counter");
    let p = embassy_rp::init(Default::default());

    static SEG7_I2C_STATIC: Seg7I2cStatic = Seg7I2c::new_static();
    let config = Seg7Config::from_build_env()?;
    let display = Seg7I2c::new(&SEG7_I2C_STATIC, p.I2C0, p.PIN_5, p.PIN_4, config, spawner)?;

    display.write_text_for("HI", Duration::from_millis(500))?;

    let mut count: i32 = 0;
    loop {
        if count % 10 == 0 {
            display
                .send_await(Seg7Command::Number {
                    value: count,
                    base: Base::Hex,
                    hold: HEX_HOLD,
                })
                .await;
        } else {
            display.write_number(count);
        }
        count = count.wrapping_add(1);
        Timer::after(STEP).await;
    }
}
