//! Strongly typed parameter enumerations for the MPU6050 driver.

use modular_bitfield::prelude::Specifier;

/// Accelerometer full-scale selections (`ACCEL_CONFIG[4:3]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum AccelRange {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl AccelRange {
    /// Output LSB per g for this range.
    pub const fn lsb_per_g(self) -> i16 {
        match self {
            Self::G2 => 16384,
            Self::G4 => 8192,
            Self::G8 => 4096,
            Self::G16 => 2048,
        }
    }
}

/// Gyroscope full-scale selections (`GYRO_CONFIG[4:3]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum GyroRange {
    /// ±250 °/s.
    Dps250 = 0b00,
    /// ±500 °/s.
    Dps500 = 0b01,
    /// ±1000 °/s.
    Dps1000 = 0b10,
    /// ±2000 °/s.
    Dps2000 = 0b11,
}

impl GyroRange {
    /// Output LSB per °/s for this range.
    pub const fn lsb_per_dps(self) -> f32 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }
}

/// Digital low-pass filter selections (`CONFIG[2:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum DlpfMode {
    /// 260 Hz accelerometer bandwidth (filter off).
    Bw260 = 0b000,
    /// 184 Hz.
    Bw184 = 0b001,
    /// 94 Hz.
    Bw94 = 0b010,
    /// 44 Hz.
    Bw44 = 0b011,
    /// 21 Hz.
    Bw21 = 0b100,
    /// 10 Hz.
    Bw10 = 0b101,
    /// 5 Hz.
    Bw5 = 0b110,
    /// Reserved encoding.
    Reserved = 0b111,
}

/// Digital high-pass filter selections for the motion detector
/// (`ACCEL_CONFIG[2:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum HighPassFilter {
    /// Filter off, output tracks the input.
    Reset = 0b000,
    /// 5 Hz cutoff.
    Hz5 = 0b001,
    /// 2.5 Hz cutoff.
    Hz2_5 = 0b010,
    /// 1.25 Hz cutoff.
    Hz1_25 = 0b011,
    /// 0.63 Hz cutoff.
    Hz0_63 = 0b100,
    /// Hold the current sample as the reference level.
    Hold = 0b111,
}

/// Low-power cycle wake frequencies (`PWR_MGMT_2[7:6]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum WakeFrequency {
    /// 1.25 Hz.
    Hz1_25 = 0b00,
    /// 5 Hz.
    Hz5 = 0b01,
    /// 20 Hz.
    Hz20 = 0b10,
    /// 40 Hz.
    Hz40 = 0b11,
}

/// Clock source selections (`PWR_MGMT_1[2:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum ClockSource {
    /// Internal 8 MHz oscillator.
    Internal = 0b000,
    /// PLL referenced to the X gyroscope.
    GyroX = 0b001,
    /// PLL referenced to the Y gyroscope.
    GyroY = 0b010,
    /// PLL referenced to the Z gyroscope.
    GyroZ = 0b011,
    /// PLL referenced to an external 32.768 kHz clock.
    External32k = 0b100,
    /// PLL referenced to an external 19.2 MHz clock.
    External19M = 0b101,
    /// Stop the clock, holding the timing generator in reset.
    Stop = 0b111,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accel_scale_halves_as_the_range_doubles() {
        assert_eq!(AccelRange::G2.lsb_per_g(), 16384);
        assert_eq!(AccelRange::G16.lsb_per_g(), 2048);
    }

    #[test]
    fn filter_codes_match_the_register_map() {
        assert_eq!(DlpfMode::Bw260 as u8, 0);
        assert_eq!(DlpfMode::Bw5 as u8, 6);
        assert_eq!(HighPassFilter::Hold as u8, 7);
        assert_eq!(WakeFrequency::Hz40 as u8, 3);
    }
}
