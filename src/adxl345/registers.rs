//! Register map definitions for the ADXL345 accelerometer.

use modular_bitfield::prelude::*;

use crate::field::{BitField, BitFlag};

/// Default I2C address (ALT pin low).
pub const I2C_ADDRESS: u8 = 0x53;
/// Alternate I2C address (ALT pin high).
pub const I2C_ADDRESS_ALT: u8 = 0x1D;
/// Expected `DEVID` register content.
pub const DEVICE_ID: u8 = 0xE5;

/// Register address of `DEVID`.
pub const REG_DEVID: u8 = 0x00;
/// Register address of `OFSX`.
pub const REG_OFSX: u8 = 0x1E;
/// Register address of `OFSY`.
pub const REG_OFSY: u8 = 0x1F;
/// Register address of `OFSZ`.
pub const REG_OFSZ: u8 = 0x20;
/// Register address of `THRESH_ACT`.
pub const REG_THRESH_ACT: u8 = 0x24;
/// Register address of `THRESH_INACT`.
pub const REG_THRESH_INACT: u8 = 0x25;
/// Register address of `TIME_INACT`.
pub const REG_TIME_INACT: u8 = 0x26;
/// Register address of `ACT_INACT_CTL`.
pub const REG_ACT_INACT_CTL: u8 = 0x27;
/// Register address of `BW_RATE`.
pub const REG_BW_RATE: u8 = 0x2C;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `INT_ENABLE`.
pub const REG_INT_ENABLE: u8 = 0x2E;
/// Register address of `INT_MAP`.
pub const REG_INT_MAP: u8 = 0x2F;
/// Register address of `INT_SOURCE`.
pub const REG_INT_SOURCE: u8 = 0x30;
/// Register address of `DATA_FORMAT`.
pub const REG_DATA_FORMAT: u8 = 0x31;
/// Register address of `DATAX0`, start of the six-byte sample burst.
pub const REG_DATAX0: u8 = 0x32;
/// Register address of `FIFO_CTL`.
pub const REG_FIFO_CTL: u8 = 0x38;
/// Register address of `FIFO_STATUS`.
pub const REG_FIFO_STATUS: u8 = 0x39;

// BW_RATE fields.
/// Output data rate code (`BW_RATE[3:0]`).
pub const RATE: BitField = BitField::new(REG_BW_RATE, 3, 4);
/// Low-power mode bit (`BW_RATE[4]`).
pub const LOW_POWER: BitFlag = BitFlag::new(REG_BW_RATE, 4);

// POWER_CTL fields.
/// Measurement enable bit (`POWER_CTL[3]`).
pub const MEASURE: BitFlag = BitFlag::new(REG_POWER_CTL, 3);
/// Activity/inactivity link bit (`POWER_CTL[5]`).
pub const LINK: BitFlag = BitFlag::new(REG_POWER_CTL, 5);
/// Autosleep enable bit (`POWER_CTL[4]`).
pub const AUTO_SLEEP: BitFlag = BitFlag::new(REG_POWER_CTL, 4);

// DATA_FORMAT fields.
/// Range code (`DATA_FORMAT[1:0]`).
pub const RANGE: BitField = BitField::new(REG_DATA_FORMAT, 1, 2);
/// Full-resolution bit (`DATA_FORMAT[3]`).
pub const FULL_RES: BitFlag = BitFlag::new(REG_DATA_FORMAT, 3);

// ACT_INACT_CTL per-axis participation bits.
/// Activity X enable (`ACT_INACT_CTL[6]`).
pub const ACT_X_ENABLE: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 6);
/// Activity Y enable (`ACT_INACT_CTL[5]`).
pub const ACT_Y_ENABLE: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 5);
/// Activity Z enable (`ACT_INACT_CTL[4]`).
pub const ACT_Z_ENABLE: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 4);
/// Activity ac-coupled bit (`ACT_INACT_CTL[7]`).
pub const ACT_AC_COUPLED: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 7);
/// Inactivity X enable (`ACT_INACT_CTL[2]`).
pub const INACT_X_ENABLE: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 2);
/// Inactivity Y enable (`ACT_INACT_CTL[1]`).
pub const INACT_Y_ENABLE: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 1);
/// Inactivity Z enable (`ACT_INACT_CTL[0]`).
pub const INACT_Z_ENABLE: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 0);
/// Inactivity ac-coupled bit (`ACT_INACT_CTL[3]`).
pub const INACT_AC_COUPLED: BitFlag = BitFlag::new(REG_ACT_INACT_CTL, 3);

// INT_ENABLE bits.
/// Data-ready interrupt enable (`INT_ENABLE[7]`).
pub const DATA_READY_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 7);
/// Activity interrupt enable (`INT_ENABLE[4]`).
pub const ACTIVITY_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 4);
/// Inactivity interrupt enable (`INT_ENABLE[3]`).
pub const INACTIVITY_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 3);
/// Watermark interrupt enable (`INT_ENABLE[1]`).
pub const WATERMARK_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 1);
/// Overrun interrupt enable (`INT_ENABLE[0]`).
pub const OVERRUN_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 0);

// FIFO_CTL fields.
/// FIFO mode code (`FIFO_CTL[7:6]`).
pub const FIFO_MODE: BitField = BitField::new(REG_FIFO_CTL, 7, 2);
/// Watermark sample count (`FIFO_CTL[4:0]`).
pub const FIFO_SAMPLES: BitField = BitField::new(REG_FIFO_CTL, 4, 5);

// FIFO_STATUS fields.
/// Buffered entry count (`FIFO_STATUS[5:0]`).
pub const FIFO_ENTRIES: BitField = BitField::new(REG_FIFO_STATUS, 5, 6);

/// Maximum watermark value the five-bit `FIFO_CTL` field accepts.
pub const MAX_WATERMARK: u8 = 31;

/// Bitfield representation of the `INT_SOURCE` register (address `0x30`).
///
/// Reading the register clears its latched event bits, so callers should
/// take one snapshot and branch on all relevant flags before reading again.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntSource {
    // FIFO overrun flag (bit 0).
    pub overrun: bool,
    // Watermark reached flag (bit 1).
    pub watermark: bool,
    // Free-fall event flag (bit 2).
    pub free_fall: bool,
    // Inactivity event flag (bit 3).
    pub inactivity: bool,
    // Activity event flag (bit 4).
    pub activity: bool,
    // Double-tap event flag (bit 5).
    pub double_tap: bool,
    // Single-tap event flag (bit 6).
    pub single_tap: bool,
    // Data ready flag (bit 7).
    pub data_ready: bool,
}

impl From<u8> for IntSource {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<IntSource> for u8 {
    fn from(value: IntSource) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT_MAP` register (address `0x2F`).
///
/// A cleared bit routes the event to INT1, a set bit to INT2.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntMap {
    // FIFO overrun routing (bit 0).
    pub overrun: bool,
    // Watermark routing (bit 1).
    pub watermark: bool,
    // Free-fall routing (bit 2).
    pub free_fall: bool,
    // Inactivity routing (bit 3).
    pub inactivity: bool,
    // Activity routing (bit 4).
    pub activity: bool,
    // Double-tap routing (bit 5).
    pub double_tap: bool,
    // Single-tap routing (bit 6).
    pub single_tap: bool,
    // Data-ready routing (bit 7).
    pub data_ready: bool,
}

impl From<u8> for IntMap {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<IntMap> for u8 {
    fn from(value: IntMap) -> Self {
        value.into_bytes()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that INT_SOURCE bitfields match the datasheet layout.
    #[test]
    fn int_source_layout_matches_datasheet() {
        let source = IntSource::from(0b1001_1000);
        assert!(source.data_ready());
        assert!(source.activity());
        assert!(source.inactivity());
        assert!(!source.watermark());
        assert!(!source.overrun());
        assert!(!source.single_tap());
    }

    #[test]
    fn int_map_roundtrips_through_its_raw_byte() {
        let map = IntMap::new().with_watermark(true).with_overrun(true);
        assert_eq!(u8::from(map), 0b0000_0011);
        let decoded = IntMap::from(0b0000_0011);
        assert!(decoded.watermark());
        assert!(decoded.overrun());
        assert!(!decoded.activity());
    }

    #[test]
    fn field_descriptors_sit_on_their_documented_registers() {
        assert_eq!(RATE.register(), REG_BW_RATE);
        assert_eq!(FIFO_MODE.register(), REG_FIFO_CTL);
        assert_eq!(FIFO_ENTRIES.register(), REG_FIFO_STATUS);
        assert_eq!(MEASURE.register(), REG_POWER_CTL);
    }
}
