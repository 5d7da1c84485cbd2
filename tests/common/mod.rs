#![allow(dead_code)]

use embedded_hal_async::{
    delay::DelayNs,
    i2c::{ErrorKind, ErrorType, I2c, Operation},
};
pub use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
pub use embedded_hal_async::i2c::NoAcknowledgeSource;

pub const ADDR_HIGH: u8 = 0b110_1011;
pub const ADDR_LOW: u8 = 0b110_1010;
pub const WHO_AM_I: u8 = 0x0F;
pub const DS33_ID: u8 = 0x69;

pub fn trans_who_am_i(address: u8, id: u8) -> I2cTrans {
    I2cTrans::write_read(address, vec![WHO_AM_I], vec![id])
}

pub fn trans_no_ack(address: u8) -> I2cTrans {
    I2cTrans::write_read(address, vec![WHO_AM_I], vec![0])
        .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
}

/// Delay that has always already elapsed
pub struct InstantDelay;

impl DelayNs for InstantDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Bus answering every read with `data`, after yielding `polls` times.
/// A stalled bus never answers.
pub struct StubBus {
    pub data: [u8; 6],
    pub polls: usize,
    pub stalled: bool,
    pub transfers: usize,
}

impl StubBus {
    pub fn new(data: [u8; 6]) -> Self {
        Self {
            data,
            polls: 0,
            stalled: false,
            transfers: 0,
        }
    }
}

impl ErrorType for StubBus {
    type Error = ErrorKind;
}

impl I2c for StubBus {
    async fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transfers += 1;
        if self.stalled {
            core::future::pending::<()>().await;
        }
        for _ in 0..self.polls {
            embassy_futures::yield_now().await;
        }
        for op in operations.iter_mut() {
            if let Operation::Read(buf) = op {
                let n = buf.len();
                buf.copy_from_slice(&self.data[..n]);
            }
        }
        Ok(())
    }
}
