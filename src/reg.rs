/// Register map of the LSM6DS33
#[allow(unused)]
#[repr(u8)]
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reg {
    FuncCfgAccess = 0x01,

    FifoCtrl1 = 0x06,
    FifoCtrl2 = 0x07,
    FifoCtrl3 = 0x08,
    FifoCtrl4 = 0x09,
    FifoCtrl5 = 0x0A,
    OrientCfgG = 0x0B,

    Int1Ctrl = 0x0D,
    Int2Ctrl = 0x0E,
    WhoAmI = 0x0F,
    Ctrl1Xl = 0x10,
    Ctrl2G = 0x11,
    Ctrl3C = 0x12,
    Ctrl4C = 0x13,
    Ctrl5C = 0x14,
    Ctrl6C = 0x15,
    Ctrl7G = 0x16,
    Ctrl8Xl = 0x17,
    Ctrl9Xl = 0x18,
    Ctrl10C = 0x19,

    WakeUpSrc = 0x1B,
    TapSrc = 0x1C,
    D6dSrc = 0x1D,
    StatusReg = 0x1E,

    OutTempL = 0x20,
    OutTempH = 0x21,
    OutxLG = 0x22,
    OutxHG = 0x23,
    OutyLG = 0x24,
    OutyHG = 0x25,
    OutzLG = 0x26,
    OutzHG = 0x27,
    OutxLXl = 0x28,
    OutxHXl = 0x29,
    OutyLXl = 0x2A,
    OutyHXl = 0x2B,
    OutzLXl = 0x2C,
    OutzHXl = 0x2D,

    FifoStatus1 = 0x3A,
    FifoStatus2 = 0x3B,
    FifoStatus3 = 0x3C,
    FifoStatus4 = 0x3D,
    FifoDataOutL = 0x3E,
    FifoDataOutH = 0x3F,
    Timestamp0Reg = 0x40,
    Timestamp1Reg = 0x41,
    Timestamp2Reg = 0x42,

    StepTimestampL = 0x49,
    StepTimestampH = 0x4A,
    StepCounterL = 0x4B,
    StepCounterH = 0x4C,

    FuncSrc = 0x53,

    TapCfg = 0x58,
    TapThs6d = 0x59,
    IntDur2 = 0x5A,
    WakeUpThs = 0x5B,
    WakeUpDur = 0x5C,
    FreeFall = 0x5D,
    Md1Cfg = 0x5E,
    Md2Cfg = 0x5F,
}

impl Reg {
    pub const fn reg(self) -> u8 {
        self as u8
    }
}

impl From<Reg> for u8 {
    fn from(reg: Reg) -> Self {
        reg.reg()
    }
}

// CTRL1_XL / CTRL2_G: ODR = 1000 (1.66 kHz, high performance), full scale 00
pub(crate) const CTRL_ODR_1660HZ: u8 = 0b1000_0000;

// CTRL3_C: IF_INC = 1
pub(crate) const CTRL3_C_IF_INC: u8 = 0b0000_0100;
