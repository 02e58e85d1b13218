//! Compile-only verification of `Seg7I2c` construction and its command helpers.
//!
//! Run via: `cargo check-all` (xtask compiles this for thumbv6m-none-eabi)

#![cfg(not(feature = "host"))]
#![no_std]
#![no_main]
#![allow(dead_code, reason = "Compile-time verification only")]

use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Duration;
use panic_probe as _;
use seg7_kit::{
    Base, BlinkRate, Brightness, Result, Seg7Command, Seg7Config, Seg7I2c, Seg7I2cStatic,
};

/// Verify that Seg7I2c builds on I2C0 and accepts every command
async fn test_seg7_i2c_commands(p: embassy_rp::Peripherals, spawner: Spawner) -> Result<()> {
    static SEG7_I2C_STATIC: Seg7I2cStatic = Seg7I2c::new_static();
    let display = Seg7I2c::new(
        &SEG7_I2C_STATIC,
        p.I2C0,
        p.PIN_1,
        p.PIN_0,
        Seg7Config::default(),
        spawner,
    )?;

    display.write_text("8.8.8.8.")?;
    display.write_text_for("done", Duration::from_secs(2))?;
    display.write_number(-999);
    display.write_float(3.25, 2);
    display.write_time(23, 59);
    display.set_colon(false);
    display.set_brightness(Brightness::saturating(4));
    display.set_blink_rate(BlinkRate::HalfHz);
    display.set_display_on(true);
    display.clear();
    display
        .send_await(Seg7Command::Number {
            value: 0b1011,
            base: Base::Binary,
            hold: Duration::from_ticks(0),
        })
        .await;

    Ok(())
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    // This main function exists only to satisfy the compiler.
    // The actual verification happens at compile time via the function above.
}

#[cfg(not(target_arch = "arm"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo<'_>) -> ! {
    loop {}
}
