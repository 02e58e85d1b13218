//! Host-level checks of the display driver against a recording I2C bus.

use embassy_futures::block_on;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use seg7_kit::mock_i2c::RecordingI2c;
use seg7_kit::{Base, BlinkRate, Brightness, Error, Seg7Config, Seg7Display};

const ADDRESS: u8 = 0x70;

fn started_display() -> Seg7Display<RecordingI2c> {
    let mut display = Seg7Display::new(RecordingI2c::new(), ADDRESS).expect("valid address");
    block_on(display.begin()).expect("bus ok");
    display
}

/// The RAM frame the display sends: address byte, then rows 0-7 low byte first.
fn ram_frame(rows: [u8; 5]) -> [u8; 17] {
    let mut frame = [0_u8; 17];
    for (row, bits) in rows.iter().enumerate() {
        frame[1 + 2 * row] = *bits;
    }
    frame
}

fn last_frame(display: Seg7Display<RecordingI2c>) -> Vec<u8> {
    let i2c = display.release();
    i2c.last_write().expect("a write").to_vec()
}

#[test]
fn number_is_flushed_to_digit_rows() {
    let mut display = started_display();
    display.write_number(1234).expect("fits");
    block_on(display.flush()).expect("bus ok");
    assert_eq!(
        last_frame(display),
        ram_frame([0x06, 0x5B, 0x00, 0x4F, 0x66])
    );
}

#[test]
fn time_lights_colon_row() {
    let mut display = started_display();
    display.write_time(12, 30).expect("valid time");
    block_on(display.flush()).expect("bus ok");
    assert_eq!(
        last_frame(display),
        ram_frame([0x06, 0x5B, 0x02, 0x4F, 0x3F])
    );
}

#[test]
fn float_and_hex_render() {
    let mut display = started_display();
    display.write_float(-2.5, 1).expect("fits");
    assert_eq!(
        display.display_ram(),
        [0x00, 0x40, 0x00, 0x5B | 0x80, 0x6D, 0, 0, 0]
    );

    display.write_number_base(0xF00D, Base::Hex).expect("fits");
    block_on(display.flush()).expect("bus ok");
    assert_eq!(
        last_frame(display),
        ram_frame([0x71, 0x3F, 0x00, 0x3F, 0x5E])
    );
}

#[test]
fn overflow_flushes_dashes() {
    let mut display = started_display();
    assert!(matches!(
        display.write_number(-12_345),
        Err(Error::NumberOverflow)
    ));
    block_on(display.flush()).expect("bus ok");
    assert_eq!(
        last_frame(display),
        ram_frame([0x40, 0x40, 0x00, 0x40, 0x40])
    );
}

#[test]
fn brightness_and_blink_are_immediate() {
    let mut display = started_display();
    block_on(async {
        display
            .set_brightness(Brightness::new(8).expect("in range"))
            .await
            .expect("bus ok");
        display
            .set_blink_rate(BlinkRate::TwoHz)
            .await
            .expect("bus ok");
    });
    let i2c = display.release();
    let writes: Vec<(u8, Vec<u8>)> = i2c
        .writes()
        .map(|(address, bytes)| (address, bytes.to_vec()))
        .collect();
    assert_eq!(writes.len(), 6);
    assert_eq!(writes[4], (ADDRESS, vec![0xE8]));
    assert_eq!(writes[5], (ADDRESS, vec![0x83]));
}

#[test]
fn rejected_arguments_cause_no_bus_traffic() {
    let mut display = started_display();
    assert!(matches!(
        display.write_digit_raw(4, 0xFF),
        Err(Error::IndexOutOfBounds)
    ));
    assert!(matches!(
        display.write_time(24, 60),
        Err(Error::InvalidTime(24, 60))
    ));
    assert!(matches!(Brightness::new(99), Err(Error::BrightnessOutOfRange(99))));
    let i2c = display.release();
    assert_eq!(i2c.write_count(), 4, "only the begin sequence");
}

#[test]
fn bus_failure_surfaces_as_i2c_error() {
    let mut i2c = RecordingI2c::new();
    i2c.fail_with(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    let mut display = Seg7Display::new(i2c, ADDRESS).expect("valid address");
    let result = block_on(display.begin());
    assert!(matches!(result, Err(Error::I2c(ErrorKind::NoAcknowledge(_)))));
    assert!(!display.is_display_on());
}

#[test]
fn display_restarts_once_bus_recovers() {
    let mut i2c = RecordingI2c::new();
    i2c.fail_with(ErrorKind::ArbitrationLoss);
    let mut display = Seg7Display::new(i2c, ADDRESS).expect("valid address");
    assert!(block_on(display.begin()).is_err());

    let mut i2c = display.release();
    i2c.succeed();
    let mut display = Seg7Display::new(i2c, ADDRESS).expect("valid address");
    block_on(display.begin()).expect("bus ok");
    display.write_number(7).expect("fits");
    block_on(display.flush()).expect("bus ok");

    let mut i2c = display.release();
    assert_eq!(i2c.write_count(), 5);
    assert_eq!(i2c.last_write(), Some(&ram_frame([0, 0, 0, 0, 0x07])[..]));
    i2c.clear();
    assert_eq!(i2c.write_count(), 0);
    assert_eq!(i2c.last_write(), None);
}

#[test]
fn configured_display_starts_with_config() {
    let config = Seg7Config::parse("0x72", "3", "1hz").expect("valid config");
    let mut display = Seg7Display::new(RecordingI2c::new(), config.address).expect("valid");
    block_on(display.begin_with(config)).expect("bus ok");
    assert_eq!(display.address(), 0x72);
    let i2c = display.release();
    let last_two: Vec<Vec<u8>> = i2c
        .writes()
        .skip(4)
        .map(|(_, bytes)| bytes.to_vec())
        .collect();
    assert_eq!(last_two, vec![vec![0xE3], vec![0x85]]);
}
