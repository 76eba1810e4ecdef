//! Strongly typed parameter enumerations for the LIS3DH driver.
//!
//! # Examples
//!
//! ```rust
//! use motionlab::lis3dh::params::{DataRate, FullScale};
//!
//! let rate = DataRate::Hz100;
//! let scale = FullScale::G2;
//! let _ = (rate, scale);
//! ```

use modular_bitfield::prelude::Specifier;

/// Output data rate selections (`CTRL_REG1[7:4]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 4]
pub enum DataRate {
    /// Power-down mode.
    PowerDown = 0b0000,
    /// 1 Hz.
    Hz1 = 0b0001,
    /// 10 Hz.
    Hz10 = 0b0010,
    /// 25 Hz.
    Hz25 = 0b0011,
    /// 50 Hz.
    Hz50 = 0b0100,
    /// 100 Hz.
    Hz100 = 0b0101,
    /// 200 Hz.
    Hz200 = 0b0110,
    /// 400 Hz.
    Hz400 = 0b0111,
    /// 1.6 kHz (low-power mode only).
    Hz1600 = 0b1000,
    /// 1.344 kHz (5.376 kHz in low-power mode).
    Hz1344 = 0b1001,
}

/// Full-scale selections (`CTRL_REG4[5:4]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum FullScale {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl FullScale {
    /// Raw LSB per g for 16-bit left-justified high-resolution output.
    pub const fn divisor(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }
}

/// FIFO operating modes (`FIFO_CTRL_REG[7:6]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum FifoMode {
    /// FIFO disabled; bypassed.
    Bypass = 0b00,
    /// Collect until full, then stop.
    Fifo = 0b01,
    /// Circular buffer holding the latest samples.
    Stream = 0b10,
    /// Stream until a trigger event, then switch to FIFO mode.
    StreamToFifo = 0b11,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_codes_match_the_datasheet_table() {
        assert_eq!(DataRate::PowerDown as u8, 0);
        assert_eq!(DataRate::Hz100 as u8, 0b0101);
        assert_eq!(DataRate::Hz1344 as u8, 0b1001);
    }

    #[test]
    fn scale_divisors_halve_as_the_range_doubles() {
        assert_eq!(FullScale::G2.divisor(), 16384.0);
        assert_eq!(FullScale::G16.divisor(), 2048.0);
    }
}
