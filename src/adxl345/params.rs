//! Strongly typed parameter enumerations for the ADXL345 driver.

use modular_bitfield::prelude::Specifier;

/// Output data rate selections (`BW_RATE[3:0]`).
///
/// Rates above 100 Hz outrun a 400 kHz I2C bus; they are intended for SPI
/// hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 4]
pub enum DataRate {
    /// 0.10 Hz.
    Hz0_10 = 0b0000,
    /// 0.20 Hz.
    Hz0_20 = 0b0001,
    /// 0.39 Hz.
    Hz0_39 = 0b0010,
    /// 0.78 Hz.
    Hz0_78 = 0b0011,
    /// 1.56 Hz.
    Hz1_56 = 0b0100,
    /// 3.13 Hz.
    Hz3_13 = 0b0101,
    /// 6.25 Hz.
    Hz6_25 = 0b0110,
    /// 12.5 Hz.
    Hz12_5 = 0b0111,
    /// 25 Hz.
    Hz25 = 0b1000,
    /// 50 Hz.
    Hz50 = 0b1001,
    /// 100 Hz.
    Hz100 = 0b1010,
    /// 200 Hz.
    Hz200 = 0b1011,
    /// 400 Hz.
    Hz400 = 0b1100,
    /// 800 Hz.
    Hz800 = 0b1101,
    /// 1600 Hz.
    Hz1600 = 0b1110,
    /// 3200 Hz.
    Hz3200 = 0b1111,
}

impl DataRate {
    /// Returns the nominal rate in millihertz.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Hz0_10 => 100,
            Self::Hz0_20 => 200,
            Self::Hz0_39 => 390,
            Self::Hz0_78 => 780,
            Self::Hz1_56 => 1_560,
            Self::Hz3_13 => 3_130,
            Self::Hz6_25 => 6_250,
            Self::Hz12_5 => 12_500,
            Self::Hz25 => 25_000,
            Self::Hz50 => 50_000,
            Self::Hz100 => 100_000,
            Self::Hz200 => 200_000,
            Self::Hz400 => 400_000,
            Self::Hz800 => 800_000,
            Self::Hz1600 => 1_600_000,
            Self::Hz3200 => 3_200_000,
        }
    }
}

/// Measurement range selections (`DATA_FORMAT[1:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum Range {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl Range {
    /// Output LSB per g for this range. In full resolution the scale is
    /// fixed at 256 LSB/g regardless of range.
    pub const fn lsb_per_g(self, full_res: bool) -> i16 {
        if full_res {
            return 256;
        }

        match self {
            Self::G2 => 256,
            Self::G4 => 128,
            Self::G8 => 64,
            Self::G16 => 32,
        }
    }
}

/// FIFO operating modes (`FIFO_CTL[7:6]`).
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
    /// Hold samples around a trigger event.
    Trigger = 0b11,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_tracks_range_only_in_fixed_resolution() {
        assert_eq!(Range::G2.lsb_per_g(false), 256);
        assert_eq!(Range::G16.lsb_per_g(false), 32);
        assert_eq!(Range::G16.lsb_per_g(true), 256);
    }

    #[test]
    fn rate_codes_cover_the_full_four_bit_space() {
        assert_eq!(DataRate::Hz0_10 as u8, 0x0);
        assert_eq!(DataRate::Hz100 as u8, 0xA);
        assert_eq!(DataRate::Hz3200 as u8, 0xF);
        assert_eq!(DataRate::Hz25.millihertz(), 25_000);
    }
}
