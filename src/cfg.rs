use crate::reg::{Reg, CTRL3_C_IF_INC, CTRL_ODR_1660HZ};

/// Driver settings applied before and during detection
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lsm6Config {
    pub device: DeviceType,
    pub sa0: Sa0State,
    /// Burst read timeout in milliseconds, 0 waits forever
    pub timeout_ms: u16,
}

impl Default for Lsm6Config {
    fn default() -> Self {
        Self {
            device: DeviceType::Auto,
            sa0: Sa0State::Auto,
            timeout_ms: 0,
        }
    }
}

/// Supported chip variants
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceType {
    /// Detect the variant by probing the bus
    #[default]
    Auto,
    /// LSM6DS33, identifies itself with `0x69`
    Ds33,
}

impl DeviceType {
    /// Value the variant reports in `WHO_AM_I`
    pub const fn who_am_i_id(self) -> Option<u8> {
        match self {
            Self::Auto => None,
            Self::Ds33 => Some(0x69),
        }
    }

    /// 7-bit bus address of the variant for a given level of the `SA0` pin
    pub const fn address(self, sa0: Sa0State) -> Option<u8> {
        match (self, sa0) {
            (Self::Ds33, Sa0State::High) => Some(0b110_1011),
            (Self::Ds33, Sa0State::Low) => Some(0b110_1010),
            _ => None,
        }
    }

    /// Register writes establishing the default operating mode:
    /// - accelerometer at 1.66 kHz (high performance), +/- 2 g
    /// - gyroscope at 1.66 kHz (high performance), 245 dps
    /// - automatic register address increment for burst reads
    ///
    /// Other settings held by these registers are reset.
    pub const fn default_config(self) -> &'static [(Reg, u8)] {
        match self {
            Self::Auto => &[],
            Self::Ds33 => &[
                (Reg::Ctrl1Xl, CTRL_ODR_1660HZ),
                (Reg::Ctrl2G, CTRL_ODR_1660HZ),
                (Reg::Ctrl3C, CTRL3_C_IF_INC),
            ],
        }
    }

    /// Variants worth probing for when this one is requested
    pub(crate) const fn candidates(self) -> &'static [DeviceType] {
        match self {
            Self::Auto | Self::Ds33 => &[Self::Ds33],
        }
    }
}

/// Level of the `SA0` pin, which selects between the two bus addresses of a chip
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sa0State {
    Low,
    High,
    /// Detect the pin level by probing the bus
    #[default]
    Auto,
}

impl Sa0State {
    /// Pin levels to try, in order, when this one is requested. High goes first.
    pub(crate) const fn probe_order(self) -> &'static [Sa0State] {
        match self {
            Self::Auto => &[Self::High, Self::Low],
            Self::High => &[Self::High],
            Self::Low => &[Self::Low],
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lsm6Error<E> {
    /// An error occured on the I2C bus
    Bus(E),
    /// No device was detected, or the driver has not been initialized yet
    NotDetected,
}

impl<E> From<E> for Lsm6Error<E> {
    fn from(error: E) -> Self {
        Lsm6Error::Bus(error)
    }
}
