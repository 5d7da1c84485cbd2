#![no_std]

use embassy_futures::select::{select, Either};
use embedded_hal::i2c::{Error as _, ErrorKind};
use embedded_hal_async::{delay::DelayNs, i2c::I2c};
use nalgebra::Vector3;

#[macro_use]
mod fmt;

mod cfg;
mod reg;

pub use crate::cfg::*;
pub use crate::reg::Reg;

/// Outcome of the most recent transmission on the bus, `Ok(())` if it was acknowledged
pub type Status = Result<(), ErrorKind>;

// Trait to allow for generic behavior across bus wrappers
#[allow(async_fn_in_trait)]
pub trait BusTransfer {
    type Error;
    type Inner;
    fn destroy(self) -> Self::Inner;
    async fn bus_transfer(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error>;
    async fn bus_write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error>;
}

// Type to hold the bus together with the outcome of its latest transmission
pub struct StatusBus<I2C> {
    bus_inner: I2C,
    last_status: Status,
}

impl<I2C: I2c> StatusBus<I2C> {
    fn record(&mut self, res: &Result<(), I2C::Error>) {
        self.last_status = res.as_ref().map(|_| ()).map_err(|e| e.kind());
    }
}

// Implementation of bus trait for I2c, recording the status of every transmission
impl<I2C: I2c> BusTransfer for StatusBus<I2C> {
    type Error = I2C::Error;
    type Inner = I2C;

    fn destroy(self) -> I2C {
        self.bus_inner
    }

    async fn bus_transfer(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), I2C::Error> {
        let res = self.bus_inner.write_read(address, write, read).await;
        self.record(&res);
        res
    }

    async fn bus_write(&mut self, address: u8, write: &[u8]) -> Result<(), I2C::Error> {
        let res = self.bus_inner.write(address, write).await;
        self.record(&res);
        res
    }
}

pub struct Lsm6<I2C, DELAY> {
    bus: StatusBus<I2C>,
    config: Lsm6Config,
    delay: DELAY,
    device: DeviceType,
    sa0: Sa0State,
    address: Option<u8>,
    did_timeout: bool,
    acc: Vector3<i16>,
    gyr: Vector3<i16>,
}

impl<I2C, DELAY> Lsm6<I2C, DELAY>
where
    I2C: I2c,
    DELAY: DelayNs,
{
    /// Creates an undetected IMU struct with the given config.
    #[must_use]
    pub fn new_from_cfg(bus: I2C, cfg: Lsm6Config, delay: DELAY) -> Self {
        Self {
            bus: StatusBus {
                bus_inner: bus,
                last_status: Ok(()),
            },
            config: cfg,
            delay,
            device: DeviceType::Auto,
            sa0: Sa0State::Auto,
            address: None,
            did_timeout: false,
            acc: Vector3::zeros(),
            gyr: Vector3::zeros(),
        }
    }

    /// Creates an undetected IMU struct with a default config (full auto-detection, no timeout).
    #[must_use]
    pub fn new(bus: I2C, delay: DELAY) -> Self {
        Self::new_from_cfg(bus, Lsm6Config::default(), delay)
    }

    /// Consumes the `Lsm6` and releases the bus back to the user
    #[must_use]
    pub fn destroy(self) -> I2C {
        self.bus.destroy()
    }

    /// Direct access to the underlying bus
    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.bus.bus_inner
    }

    /*
        Configuration methods
    */

    /// Set the variant `init_from_cfg` looks for
    #[must_use]
    pub fn device(self, device: DeviceType) -> Self {
        Lsm6 {
            config: Lsm6Config {
                device,
                ..self.config
            },
            ..self
        }
    }

    /// Set the `SA0` pin level `init_from_cfg` assumes
    #[must_use]
    pub fn sa0(self, sa0: Sa0State) -> Self {
        Lsm6 {
            config: Lsm6Config { sa0, ..self.config },
            ..self
        }
    }

    /// Set the burst read timeout in milliseconds, 0 disables it
    #[must_use]
    pub fn timeout(self, timeout_ms: u16) -> Self {
        Lsm6 {
            config: Lsm6Config {
                timeout_ms,
                ..self.config
            },
            ..self
        }
    }

    /*
        Detection
    */

    /// Detects the device with the variant and `SA0` level from the config
    pub async fn init_from_cfg(&mut self) -> Result<(), Lsm6Error<I2C::Error>> {
        self.init(self.config.device, self.config.sa0).await
    }

    /// Resolves variant and bus address of the device.
    ///
    /// When both `device` and `sa0` are given explicitly the address is computed
    /// without touching the bus. Otherwise the `WHO_AM_I` register is probed at
    /// each candidate address, `SA0` high first, and the first match wins.
    ///
    /// On failure a previously detected identity is kept.
    pub async fn init(
        &mut self,
        device: DeviceType,
        sa0: Sa0State,
    ) -> Result<(), Lsm6Error<I2C::Error>> {
        let (device, sa0) = if device != DeviceType::Auto && sa0 != Sa0State::Auto {
            (device, sa0)
        } else {
            self.detect(device, sa0)
                .await
                .ok_or(Lsm6Error::NotDetected)?
        };

        let address = device.address(sa0).ok_or(Lsm6Error::NotDetected)?;
        debug!("lsm6: using {} at {=u8:#x}", device, address);

        self.device = device;
        self.sa0 = sa0;
        self.address = Some(address);
        Ok(())
    }

    /// Probe each candidate variant and address until one identifies itself
    async fn detect(
        &mut self,
        device: DeviceType,
        sa0: Sa0State,
    ) -> Option<(DeviceType, Sa0State)> {
        for &candidate in device.candidates() {
            let Some(id) = candidate.who_am_i_id() else {
                continue;
            };
            for &level in sa0.probe_order() {
                let Some(address) = candidate.address(level) else {
                    continue;
                };
                match self.test_register(address, Reg::WhoAmI).await {
                    Some(whoami) if whoami == id => return Some((candidate, level)),
                    Some(whoami) => trace!("lsm6: {=u8:#x} reports {=u8:#x}", address, whoami),
                    None => trace!("lsm6: no answer at {=u8:#x}", address),
                }
            }
        }
        warn!("lsm6: no device detected");
        None
    }

    /// Read a single register of whatever device answers at `address`.
    /// Returns `None` if the transfer was not acknowledged.
    pub async fn test_register(&mut self, address: u8, reg: Reg) -> Option<u8> {
        let mut buf = [0u8; 1];
        self.bus
            .bus_inner
            .write_read(address, &[reg.reg()], &mut buf)
            .await
            .ok()
            .map(|()| buf[0])
    }

    /*
        Configuration of the detected device
    */

    /// Enables accelerometer and gyroscope in the default mode of the detected
    /// variant, see `DeviceType::default_config`. Does nothing if no device was detected.
    pub async fn enable_default(&mut self) -> Result<(), Lsm6Error<I2C::Error>> {
        if self.address.is_none() {
            warn!("lsm6: enable_default called before detection");
            return Ok(());
        }

        for &(reg, value) in self.device.default_config() {
            self.write_register(reg, value).await?;
        }
        Ok(())
    }

    /// Write a single byte to the requested register
    pub async fn write_register(
        &mut self,
        reg: Reg,
        value: u8,
    ) -> Result<(), Lsm6Error<I2C::Error>> {
        let address = self.resolved_address()?;
        self.bus.bus_write(address, &[reg.reg(), value]).await?;
        Ok(())
    }

    /// Read a single byte from the requested register
    pub async fn read_register(&mut self, reg: Reg) -> Result<u8, Lsm6Error<I2C::Error>> {
        let address = self.resolved_address()?;
        let mut buf = [0u8; 1];
        self.bus.bus_transfer(address, &[reg.reg()], &mut buf).await?;
        Ok(buf[0])
    }

    /// Read the identity register of the detected device
    pub async fn who_am_i(&mut self) -> Result<u8, Lsm6Error<I2C::Error>> {
        self.read_register(Reg::WhoAmI).await
    }

    /*
        Measurements
    */

    /// Reads the 3 accelerometer channels into `acc()`.
    ///
    /// The timeout covers the whole transfer, register select included. If it
    /// expires the transfer is dropped mid-flight, `acc()` keeps its previous
    /// value and `timeout_occurred()` reports it.
    pub async fn read_acc(&mut self) -> Result<(), Lsm6Error<I2C::Error>> {
        if let Some(raw) = self.burst_read(Reg::OutxLXl).await? {
            self.acc = collect_3xi16(raw).into();
        }
        Ok(())
    }

    /// Reads the 3 gyroscope channels into `gyr()`.
    ///
    /// Timeout handling is the same as for `read_acc`.
    pub async fn read_gyr(&mut self) -> Result<(), Lsm6Error<I2C::Error>> {
        if let Some(raw) = self.burst_read(Reg::OutxLG).await? {
            self.gyr = collect_3xi16(raw).into();
        }
        Ok(())
    }

    /// Reads accelerometer and gyroscope. The gyroscope is read even if the
    /// accelerometer read fails, the first error is returned afterwards.
    pub async fn read(&mut self) -> Result<(), Lsm6Error<I2C::Error>> {
        let acc = self.read_acc().await;
        let gyr = self.read_gyr().await;
        acc.and(gyr)
    }

    /// Read 6 consecutive registers starting at `reg` (relies on `IF_INC`).
    /// `None` means the timeout expired first. Leaves `last_status` untouched.
    async fn burst_read(
        &mut self,
        reg: Reg,
    ) -> Result<Option<[u8; 6]>, Lsm6Error<I2C::Error>> {
        let address = self.resolved_address()?;
        let cmd = [reg.reg()];
        let mut buf = [0u8; 6];
        let transfer = self.bus.bus_inner.write_read(address, &cmd, &mut buf);

        if self.config.timeout_ms == 0 {
            transfer.await?;
            return Ok(Some(buf));
        }

        let deadline = self.delay.delay_ms(u32::from(self.config.timeout_ms));
        match select(transfer, deadline).await {
            Either::First(res) => {
                res?;
                Ok(Some(buf))
            }
            Either::Second(()) => {
                warn!("lsm6: read of {} timed out", reg);
                self.did_timeout = true;
                Ok(None)
            }
        }
    }

    fn resolved_address(&self) -> Result<u8, Lsm6Error<I2C::Error>> {
        self.address.ok_or(Lsm6Error::NotDetected)
    }
}

impl<I2C, DELAY> Lsm6<I2C, DELAY> {
    /// Did a timeout occur in `read_acc`, `read_gyr` or `read` since the last call?
    pub fn timeout_occurred(&mut self) -> bool {
        core::mem::take(&mut self.did_timeout)
    }

    /// Set the burst read timeout in milliseconds, 0 disables it
    pub fn set_timeout(&mut self, timeout_ms: u16) {
        self.config.timeout_ms = timeout_ms;
    }

    pub fn get_timeout(&self) -> u16 {
        self.config.timeout_ms
    }

    /// Detected variant, `DeviceType::Auto` before detection
    pub fn device_type(&self) -> DeviceType {
        self.device
    }

    /// Detected `SA0` level, `Sa0State::Auto` before detection
    pub fn sa0_state(&self) -> Sa0State {
        self.sa0
    }

    /// Bus address of the detected device
    pub fn address(&self) -> Option<u8> {
        self.address
    }

    /// Outcome of the latest `write_register` or `read_register` transmission.
    /// Probing and burst reads do not change it.
    pub fn last_status(&self) -> Status {
        self.bus.last_status
    }

    /// Latest raw accelerometer reading
    pub fn acc(&self) -> Vector3<i16> {
        self.acc
    }

    /// Latest raw gyroscope reading
    pub fn gyr(&self) -> Vector3<i16> {
        self.gyr
    }
}

/// Scales `v` in place to unit length. A zero vector ends up as NaN.
pub fn vector_normalize(v: &mut Vector3<f32>) {
    let mag = v.norm();
    *v /= mag;
}

/// Collects 6 little-endian bytes into x, y and z
fn collect_3xi16(values: [u8; 6]) -> [i16; 3] {
    let [xl, xh, yl, yh, zl, zh] = values;
    [
        i16::from_le_bytes([xl, xh]),
        i16::from_le_bytes([yl, yh]),
        i16::from_le_bytes([zl, zh]),
    ]
}
