mod common;

use common::*;
use embassy_futures::block_on;
use embedded_hal_async::i2c::ErrorKind;
use lsm6_async::{DeviceType, Lsm6, Lsm6Error, Sa0State};
use nalgebra::Vector3;

const SAMPLE: [u8; 6] = [0x34, 0x12, 0xFF, 0xFF, 0x01, 0x00];

fn detected(bus: StubBus) -> Lsm6<StubBus, InstantDelay> {
    let mut imu = Lsm6::new(bus, InstantDelay);
    block_on(imu.init(DeviceType::Ds33, Sa0State::High)).unwrap();
    imu
}

#[test]
fn burst_read_assembles_little_endian_axes() {
    let expectations = [
        I2cTrans::write_read(ADDR_HIGH, vec![0x28], SAMPLE.to_vec()),
        I2cTrans::write_read(ADDR_HIGH, vec![0x22], vec![0x00, 0x80, 0xFF, 0x7F, 0x00, 0x00]),
    ];
    let mut imu = Lsm6::new(I2cMock::new(&expectations), InstantDelay);
    block_on(imu.init(DeviceType::Ds33, Sa0State::High)).unwrap();

    block_on(imu.read()).unwrap();

    assert_eq!(imu.acc(), Vector3::new(4660, -1, 1));
    assert_eq!(imu.gyr(), Vector3::new(i16::MIN, i16::MAX, 0));
    assert!(!imu.timeout_occurred());
    imu.destroy().done();
}

#[test]
fn timeout_latch_is_consumed_once() {
    let mut imu = detected(StubBus::new(SAMPLE));
    imu.set_timeout(10);
    imu.i2c().stalled = true;

    block_on(imu.read_acc()).unwrap();

    assert!(imu.timeout_occurred());
    assert!(!imu.timeout_occurred());
}

#[test]
fn timed_out_read_keeps_stale_values() {
    let mut imu = detected(StubBus::new(SAMPLE));
    imu.set_timeout(10);

    block_on(imu.read()).unwrap();
    assert_eq!(imu.acc(), Vector3::new(4660, -1, 1));
    assert_eq!(imu.gyr(), Vector3::new(4660, -1, 1));

    imu.i2c().data = [0; 6];
    imu.i2c().stalled = true;
    block_on(imu.read_acc()).unwrap();

    assert_eq!(imu.acc(), Vector3::new(4660, -1, 1));
    assert!(imu.timeout_occurred());
}

#[test]
fn slow_bus_times_out_when_deadline_is_set() {
    let mut bus = StubBus::new(SAMPLE);
    bus.polls = 5;
    let mut imu = detected(bus);
    imu.set_timeout(1);

    block_on(imu.read_gyr()).unwrap();

    assert_eq!(imu.gyr(), Vector3::zeros());
    assert!(imu.timeout_occurred());
}

#[test]
fn zero_timeout_waits_for_data() {
    let mut bus = StubBus::new(SAMPLE);
    bus.polls = 1000;
    let mut imu = detected(bus);
    imu.set_timeout(0);

    block_on(imu.read_gyr()).unwrap();

    assert_eq!(imu.gyr(), Vector3::new(4660, -1, 1));
    assert!(!imu.timeout_occurred());
}

#[test]
fn read_attempts_gyroscope_after_accelerometer_timeout() {
    let mut imu = detected(StubBus::new(SAMPLE));
    imu.set_timeout(3);
    imu.i2c().stalled = true;

    block_on(imu.read()).unwrap();

    assert_eq!(imu.i2c().transfers, 2);
    assert!(imu.timeout_occurred());
    assert!(!imu.timeout_occurred());
}

#[test]
fn bus_error_is_not_a_timeout() {
    let expectations = [
        I2cTrans::write_read(ADDR_HIGH, vec![0x28], SAMPLE.to_vec()).with_error(ErrorKind::Bus),
        I2cTrans::write_read(ADDR_HIGH, vec![0x22], SAMPLE.to_vec()),
    ];
    let mut imu = Lsm6::new(I2cMock::new(&expectations), InstantDelay).timeout(10);
    block_on(imu.init(DeviceType::Ds33, Sa0State::High)).unwrap();

    let res = block_on(imu.read());

    assert_eq!(res, Err(Lsm6Error::Bus(ErrorKind::Bus)));
    assert_eq!(imu.acc(), Vector3::zeros());
    assert_eq!(imu.gyr(), Vector3::new(4660, -1, 1));
    assert!(!imu.timeout_occurred());
    imu.destroy().done();
}

#[test]
fn reading_before_detection_is_refused() {
    let mut imu = Lsm6::new(StubBus::new(SAMPLE), InstantDelay);

    assert_eq!(block_on(imu.read_acc()), Err(Lsm6Error::NotDetected));
    assert_eq!(imu.i2c().transfers, 0);
}
