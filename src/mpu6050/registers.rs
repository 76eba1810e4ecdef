//! Register map definitions for the MPU6050 accelerometer/gyroscope.

use modular_bitfield::prelude::*;

use crate::field::{BitField, BitFlag};

/// Default I2C address (AD0 low).
pub const I2C_ADDRESS: u8 = 0x68;
/// Alternate I2C address (AD0 high).
pub const I2C_ADDRESS_ALT: u8 = 0x69;
/// Expected `WHO_AM_I` register content.
pub const DEVICE_ID: u8 = 0x68;

/// Register address of `XA_OFFS_H`, start of the accelerometer offset pairs.
pub const REG_XA_OFFS_H: u8 = 0x06;
/// Register address of `XG_OFFS_USRH`, start of the gyroscope offset pairs.
pub const REG_XG_OFFS_USRH: u8 = 0x13;
/// Register address of `SMPLRT_DIV`.
pub const REG_SMPLRT_DIV: u8 = 0x19;
/// Register address of `CONFIG`.
pub const REG_CONFIG: u8 = 0x1A;
/// Register address of `GYRO_CONFIG`.
pub const REG_GYRO_CONFIG: u8 = 0x1B;
/// Register address of `ACCEL_CONFIG`.
pub const REG_ACCEL_CONFIG: u8 = 0x1C;
/// Register address of `MOT_THR`.
pub const REG_MOT_THR: u8 = 0x1F;
/// Register address of `MOT_DUR`.
pub const REG_MOT_DUR: u8 = 0x20;
/// Register address of `ZRMOT_THR`.
pub const REG_ZRMOT_THR: u8 = 0x21;
/// Register address of `ZRMOT_DUR`.
pub const REG_ZRMOT_DUR: u8 = 0x22;
/// Register address of `INT_PIN_CFG`.
pub const REG_INT_PIN_CFG: u8 = 0x37;
/// Register address of `INT_ENABLE`.
pub const REG_INT_ENABLE: u8 = 0x38;
/// Register address of `INT_STATUS`.
pub const REG_INT_STATUS: u8 = 0x3A;
/// Register address of `ACCEL_XOUT_H`, start of the accel/temp/gyro burst.
pub const REG_ACCEL_XOUT_H: u8 = 0x3B;
/// Register address of `TEMP_OUT_H`.
pub const REG_TEMP_OUT_H: u8 = 0x41;
/// Register address of `GYRO_XOUT_H`.
pub const REG_GYRO_XOUT_H: u8 = 0x43;
/// Register address of `SIGNAL_PATH_RESET`.
pub const REG_SIGNAL_PATH_RESET: u8 = 0x68;
/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x75;
/// Register address of `PWR_MGMT_1`.
pub const REG_PWR_MGMT_1: u8 = 0x6B;
/// Register address of `PWR_MGMT_2`.
pub const REG_PWR_MGMT_2: u8 = 0x6C;

// CONFIG fields.
/// Digital low-pass filter code (`CONFIG[2:0]`).
pub const DLPF: BitField = BitField::new(REG_CONFIG, 2, 3);

// GYRO_CONFIG fields.
/// Gyroscope full-scale code (`GYRO_CONFIG[4:3]`).
pub const GYRO_RANGE: BitField = BitField::new(REG_GYRO_CONFIG, 4, 2);

// ACCEL_CONFIG fields.
/// Accelerometer full-scale code (`ACCEL_CONFIG[4:3]`).
pub const ACCEL_RANGE: BitField = BitField::new(REG_ACCEL_CONFIG, 4, 2);
/// Motion-detector high-pass filter code (`ACCEL_CONFIG[2:0]`).
pub const ACCEL_HPF: BitField = BitField::new(REG_ACCEL_CONFIG, 2, 3);

// PWR_MGMT_1 fields.
/// Full device reset bit (`PWR_MGMT_1[7]`).
pub const DEVICE_RESET: BitFlag = BitFlag::new(REG_PWR_MGMT_1, 7);
/// Sleep bit (`PWR_MGMT_1[6]`); set at power-up.
pub const SLEEP: BitFlag = BitFlag::new(REG_PWR_MGMT_1, 6);
/// Low-power cycle bit (`PWR_MGMT_1[5]`).
pub const CYCLE: BitFlag = BitFlag::new(REG_PWR_MGMT_1, 5);
/// Clock source code (`PWR_MGMT_1[2:0]`).
pub const CLOCK_SOURCE: BitField = BitField::new(REG_PWR_MGMT_1, 2, 3);

// PWR_MGMT_2 fields.
/// Cycle-mode wake frequency code (`PWR_MGMT_2[7:6]`).
pub const WAKE_FREQUENCY: BitField = BitField::new(REG_PWR_MGMT_2, 7, 2);

// INT_PIN_CFG fields.
/// Interrupt pin active level, set for active low (`INT_PIN_CFG[7]`).
pub const INT_ACTIVE_LOW: BitFlag = BitFlag::new(REG_INT_PIN_CFG, 7);
/// Latch the interrupt pin until the status read (`INT_PIN_CFG[5]`).
pub const INT_LATCH: BitFlag = BitFlag::new(REG_INT_PIN_CFG, 5);

// INT_ENABLE bits.
/// Motion interrupt enable (`INT_ENABLE[6]`).
pub const MOTION_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 6);
/// Zero-motion interrupt enable (`INT_ENABLE[5]`).
pub const ZERO_MOTION_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 5);
/// Data-ready interrupt enable (`INT_ENABLE[0]`).
pub const DATA_READY_INT_ENABLE: BitFlag = BitFlag::new(REG_INT_ENABLE, 0);

/// Value written to `SIGNAL_PATH_RESET` to clear the gyro, accel, and
/// temperature paths at once.
pub const RESET_ALL_SIGNAL_PATHS: u8 = 0x07;

/// Bitfield representation of the `INT_STATUS` register (address `0x3A`).
///
/// Reading the register clears every latched bit, so take one snapshot and
/// branch on all relevant flags before reading again.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntStatus {
    // Data ready flag (bit 0).
    pub data_ready: bool,
    #[skip]
    __: B2,
    // I2C master event flag (bit 3).
    pub i2c_master: bool,
    // FIFO overflow flag (bit 4).
    pub fifo_overflow: bool,
    // Zero-motion event flag (bit 5).
    pub zero_motion: bool,
    // Motion event flag (bit 6).
    pub motion: bool,
    // Free-fall event flag (bit 7).
    pub free_fall: bool,
}

impl From<u8> for IntStatus {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<IntStatus> for u8 {
    fn from(value: IntStatus) -> Self {
        value.into_bytes()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that INT_STATUS bitfields match the datasheet layout.
    #[test]
    fn int_status_layout_matches_datasheet() {
        let status = IntStatus::from(0b0110_0001);
        assert!(status.motion());
        assert!(status.zero_motion());
        assert!(status.data_ready());
        assert!(!status.free_fall());
        assert!(!status.fifo_overflow());
    }

    #[test]
    fn field_descriptors_sit_on_their_documented_registers() {
        assert_eq!(DLPF.register(), REG_CONFIG);
        assert_eq!(ACCEL_RANGE.register(), REG_ACCEL_CONFIG);
        assert_eq!(CLOCK_SOURCE.register(), REG_PWR_MGMT_1);
        assert_eq!(MOTION_INT_ENABLE.register(), REG_INT_ENABLE);
    }
}
