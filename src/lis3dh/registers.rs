//! Register map definitions for the LIS3DH accelerometer.

use modular_bitfield::prelude::*;

use crate::field::{BitField, BitFlag};

/// Default I2C address (SA0 low).
pub const I2C_ADDRESS: u8 = 0x18;
/// Alternate I2C address (SA0 high).
pub const I2C_ADDRESS_ALT: u8 = 0x19;
/// Expected `WHO_AM_I` register content.
pub const DEVICE_ID: u8 = 0x33;

/// OR-ed into a register address to auto-increment over I2C burst
/// transfers. SPI transfers use the interface's own multi-byte bit.
pub const AUTO_INCREMENT: u8 = 0x80;

/// Register address of `OUT_ADC3_L`.
pub const REG_OUT_ADC3_L: u8 = 0x0C;
/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x0F;
/// Register address of `TEMP_CFG_REG`.
pub const REG_TEMP_CFG: u8 = 0x1F;
/// Register address of `CTRL_REG1`.
pub const REG_CTRL1: u8 = 0x20;
/// Register address of `CTRL_REG3`.
pub const REG_CTRL3: u8 = 0x22;
/// Register address of `CTRL_REG4`.
pub const REG_CTRL4: u8 = 0x23;
/// Register address of `CTRL_REG5`.
pub const REG_CTRL5: u8 = 0x24;
/// Register address of `STATUS_REG`.
pub const REG_STATUS: u8 = 0x27;
/// Register address of `OUT_X_L`, start of the six-byte sample burst.
pub const REG_OUT_X_L: u8 = 0x28;
/// Register address of `FIFO_CTRL_REG`.
pub const REG_FIFO_CTRL: u8 = 0x2E;
/// Register address of `FIFO_SRC_REG`.
pub const REG_FIFO_SRC: u8 = 0x2F;
/// Register address of `INT1_CFG`.
pub const REG_INT1_CFG: u8 = 0x30;
/// Register address of `INT1_SRC`.
pub const REG_INT1_SRC: u8 = 0x31;
/// Register address of `INT1_THS`.
pub const REG_INT1_THS: u8 = 0x32;
/// Register address of `INT1_DURATION`.
pub const REG_INT1_DURATION: u8 = 0x33;

// TEMP_CFG_REG fields.
/// ADC enable bit (`TEMP_CFG_REG[7]`).
pub const ADC_ENABLE: BitFlag = BitFlag::new(REG_TEMP_CFG, 7);
/// Temperature sensor enable bit (`TEMP_CFG_REG[6]`).
pub const TEMP_ENABLE: BitFlag = BitFlag::new(REG_TEMP_CFG, 6);

// CTRL_REG1 fields.
/// Output data rate code (`CTRL_REG1[7:4]`).
pub const ODR: BitField = BitField::new(REG_CTRL1, 7, 4);
/// Low-power mode bit (`CTRL_REG1[3]`).
pub const LOW_POWER: BitFlag = BitFlag::new(REG_CTRL1, 3);
/// Per-axis enable bits as one field, Z/Y/X from high to low
/// (`CTRL_REG1[2:0]`).
pub const AXES_ENABLE: BitField = BitField::new(REG_CTRL1, 2, 3);

// CTRL_REG3 routing bits.
/// Route IA1 events to the INT1 pin (`CTRL_REG3[6]`).
pub const INT1_ROUTE_IA1: BitFlag = BitFlag::new(REG_CTRL3, 6);
/// Route the FIFO watermark to the INT1 pin (`CTRL_REG3[2]`).
pub const INT1_ROUTE_WATERMARK: BitFlag = BitFlag::new(REG_CTRL3, 2);
/// Route the FIFO overrun to the INT1 pin (`CTRL_REG3[1]`).
pub const INT1_ROUTE_OVERRUN: BitFlag = BitFlag::new(REG_CTRL3, 1);

// CTRL_REG4 fields.
/// Block-data-update bit (`CTRL_REG4[7]`).
pub const BLOCK_DATA_UPDATE: BitFlag = BitFlag::new(REG_CTRL4, 7);
/// Full-scale code (`CTRL_REG4[5:4]`).
pub const FULL_SCALE: BitField = BitField::new(REG_CTRL4, 5, 2);
/// High-resolution bit (`CTRL_REG4[3]`).
pub const HIGH_RESOLUTION: BitFlag = BitFlag::new(REG_CTRL4, 3);

// CTRL_REG5 fields.
/// Reboot-memory-content bit (`CTRL_REG5[7]`).
pub const BOOT: BitFlag = BitFlag::new(REG_CTRL5, 7);
/// FIFO enable bit (`CTRL_REG5[6]`).
pub const FIFO_ENABLE: BitFlag = BitFlag::new(REG_CTRL5, 6);
/// Latch INT1 until `INT1_SRC` is read (`CTRL_REG5[3]`).
pub const LATCH_INT1: BitFlag = BitFlag::new(REG_CTRL5, 3);

// FIFO_CTRL_REG fields.
/// FIFO mode code (`FIFO_CTRL_REG[7:6]`).
pub const FIFO_MODE: BitField = BitField::new(REG_FIFO_CTRL, 7, 2);
/// Watermark threshold (`FIFO_CTRL_REG[4:0]`).
pub const FIFO_THRESHOLD: BitField = BitField::new(REG_FIFO_CTRL, 4, 5);

/// Maximum watermark value the five-bit threshold field accepts.
pub const MAX_THRESHOLD: u8 = 31;
/// Maximum INT1 threshold value the seven-bit `INT1_THS` field accepts.
pub const MAX_INT1_THRESHOLD: u8 = 127;
/// FIFO depth in samples.
pub const FIFO_DEPTH: u8 = 32;

/// Bitfield representation of the `STATUS_REG` register (address `0x27`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // X-axis data available (bit 0).
    pub x_available: bool,
    // Y-axis data available (bit 1).
    pub y_available: bool,
    // Z-axis data available (bit 2).
    pub z_available: bool,
    // New data on all axes (bit 3).
    pub xyz_available: bool,
    // X-axis overrun (bit 4).
    pub x_overrun: bool,
    // Y-axis overrun (bit 5).
    pub y_overrun: bool,
    // Z-axis overrun (bit 6).
    pub z_overrun: bool,
    // Overrun on all axes (bit 7).
    pub xyz_overrun: bool,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `FIFO_SRC_REG` register (address `0x2F`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoSrc {
    // Unread sample count (bits 4:0).
    pub samples: B5,
    // FIFO empty flag (bit 5).
    pub empty: bool,
    // FIFO overrun flag (bit 6).
    pub overrun: bool,
    // Watermark exceeded flag (bit 7).
    pub watermark: bool,
}

impl From<u8> for FifoSrc {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FifoSrc> for u8 {
    fn from(value: FifoSrc) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT1_CFG` register (address `0x30`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int1Cfg {
    // X low event enable (bit 0).
    pub x_low: bool,
    // X high event enable (bit 1).
    pub x_high: bool,
    // Y low event enable (bit 2).
    pub y_low: bool,
    // Y high event enable (bit 3).
    pub y_high: bool,
    // Z low event enable (bit 4).
    pub z_low: bool,
    // Z high event enable (bit 5).
    pub z_high: bool,
    // 6-direction detection (bit 6).
    pub six_direction: bool,
    // AND/OR combination of the enabled events (bit 7).
    pub and_combination: bool,
}

impl Int1Cfg {
    /// Event configuration matching high-g activity on all three axes.
    pub fn high_events_all_axes() -> Self {
        Self::new().with_x_high(true).with_y_high(true).with_z_high(true)
    }
}

impl From<u8> for Int1Cfg {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Int1Cfg> for u8 {
    fn from(value: Int1Cfg) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT1_SRC` register (address `0x31`).
///
/// Reading the register clears a latched interrupt; take one snapshot and
/// branch on it.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int1Src {
    // X low event (bit 0).
    pub x_low: bool,
    // X high event (bit 1).
    pub x_high: bool,
    // Y low event (bit 2).
    pub y_low: bool,
    // Y high event (bit 3).
    pub y_high: bool,
    // Z low event (bit 4).
    pub z_low: bool,
    // Z high event (bit 5).
    pub z_high: bool,
    // Interrupt active flag (bit 6).
    pub active: bool,
    #[skip]
    __: B1,
}

impl From<u8> for Int1Src {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Int1Src> for u8 {
    fn from(value: Int1Src) -> Self {
        value.into_bytes()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that STATUS_REG bitfields match the datasheet layout.
    #[test]
    fn status_layout_matches_datasheet() {
        let status = Status::from(0b1000_1000);
        assert!(status.xyz_available());
        assert!(status.xyz_overrun());
        assert!(!status.x_available());
        assert!(!status.z_overrun());
    }

    #[test]
    fn fifo_src_splits_flags_from_the_sample_count() {
        let src = FifoSrc::from(0b1001_1010);
        assert!(src.watermark());
        assert!(!src.overrun());
        assert!(!src.empty());
        assert_eq!(src.samples(), 26);
    }

    #[test]
    fn int1_cfg_helper_enables_exactly_the_high_events() {
        let cfg = Int1Cfg::high_events_all_axes();
        assert_eq!(u8::from(cfg), 0b0010_1010);
    }

    #[test]
    fn int1_src_active_flag_sits_on_bit_6() {
        let src = Int1Src::from(0b0100_0010);
        assert!(src.active());
        assert!(src.x_high());
        assert!(!src.z_high());
    }
}
