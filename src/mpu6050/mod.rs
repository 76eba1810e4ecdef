//! MPU6050 six-axis accelerometer/gyroscope driver.
//!
//! Covers the register-level surface: configuration, motion detection,
//! offset registers, and raw reads. The on-chip DMP co-processor needs a
//! vendor firmware image and is intentionally not supported.

pub mod params;
pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::Vec;
use modular_bitfield::prelude::Specifier;

use crate::calib::OffsetTarget;
use crate::capture::MotionSource;
use crate::error::{Error, Result};
use crate::interface::{I2cInterface, RegisterInterface};
use crate::poll::poll_until;
use crate::sample::Sample;

use self::params::{AccelRange, ClockSource, DlpfMode, GyroRange, HighPassFilter, WakeFrequency};
use self::registers::{
    ACCEL_HPF,
    ACCEL_RANGE,
    CLOCK_SOURCE,
    CYCLE,
    DATA_READY_INT_ENABLE,
    DEVICE_ID,
    DEVICE_RESET,
    DLPF,
    GYRO_RANGE,
    INT_ACTIVE_LOW,
    INT_LATCH,
    IntStatus,
    MOTION_INT_ENABLE,
    REG_ACCEL_XOUT_H,
    REG_GYRO_XOUT_H,
    REG_INT_STATUS,
    REG_MOT_DUR,
    REG_MOT_THR,
    REG_SIGNAL_PATH_RESET,
    REG_SMPLRT_DIV,
    REG_TEMP_OUT_H,
    REG_WHO_AM_I,
    REG_XA_OFFS_H,
    REG_XG_OFFS_USRH,
    REG_ZRMOT_DUR,
    REG_ZRMOT_THR,
    RESET_ALL_SIGNAL_PATHS,
    SLEEP,
    WAKE_FREQUENCY,
    ZERO_MOTION_INT_ENABLE,
};

// Post-reset settle time before the device accepts register writes
// (milliseconds).
const RESET_SETTLE_MS: u32 = 50;
// Number of consecutive bytes spanning X, Y, Z axis samples.
const RAW_AXIS_BYTES: usize = 6;
// Accel, temperature, and gyro words in one burst.
const RAW_MOTION_BYTES: usize = 14;

/// High-level synchronous driver for the MPU6050.
pub struct Mpu6050<IFACE> {
    interface: IFACE,
}

impl<IFACE> Mpu6050<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE) -> Self {
        Self { interface }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }
}

impl<I2C> Mpu6050<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for I2C transports at the default address.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c, registers::I2C_ADDRESS))
    }

    /// Convenience constructor for the AD0-high address.
    pub fn new_i2c_alt(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c, registers::I2C_ADDRESS_ALT))
    }

    /// Releases the driver, returning the I2C bus.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<IFACE, CommE> Mpu6050<IFACE>
where
    IFACE: RegisterInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Power ========================================
    // ==================================================================
    /// Checks presence and chip ID, then wakes the device from its
    /// power-up sleep state.
    pub fn init(&mut self) -> Result<(), CommE> {
        if !self.interface.probe().map_err(Error::from)? {
            return Err(Error::DeviceNotResponding);
        }

        let id = self
            .interface
            .read_register(REG_WHO_AM_I)
            .map_err(Error::from)?;
        if id != DEVICE_ID {
            return Err(Error::DeviceIdMismatch);
        }

        self.set_sleep(false)
    }

    /// Issues a full device reset and waits for the part to come back.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        DEVICE_RESET.write(&mut self.interface, true).map_err(Error::from)?;
        delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    /// Clears the accelerometer, gyroscope, and temperature signal paths.
    pub fn reset_signal_paths(&mut self) -> Result<(), CommE> {
        self.interface
            .write_register(REG_SIGNAL_PATH_RESET, RESET_ALL_SIGNAL_PATHS)
            .map_err(Error::from)
    }

    /// Enters or leaves sleep mode.
    pub fn set_sleep(&mut self, enabled: bool) -> Result<(), CommE> {
        SLEEP.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables low-power cycle mode: the device sleeps between single
    /// samples taken at the wake frequency.
    pub fn set_cycle(&mut self, enabled: bool) -> Result<(), CommE> {
        CYCLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Selects the cycle-mode wake frequency.
    pub fn set_wake_frequency(&mut self, frequency: WakeFrequency) -> Result<(), CommE> {
        WAKE_FREQUENCY.write(&mut self.interface, frequency as u8).map_err(Error::from)
    }

    /// Selects the clock source.
    pub fn set_clock_source(&mut self, source: ClockSource) -> Result<(), CommE> {
        CLOCK_SOURCE.write(&mut self.interface, source as u8).map_err(Error::from)
    }

    // ==================================================================
    // == Sampling Configuration ========================================
    // ==================================================================
    /// Divides the internal sample rate: rate = base / (1 + divider).
    pub fn set_sample_rate_divider(&mut self, divider: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_SMPLRT_DIV, divider)
            .map_err(Error::from)
    }

    /// Selects the digital low-pass filter bandwidth.
    pub fn set_dlpf(&mut self, mode: DlpfMode) -> Result<(), CommE> {
        DLPF.write(&mut self.interface, mode as u8).map_err(Error::from)
    }

    /// Selects the accelerometer full-scale range.
    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<(), CommE> {
        ACCEL_RANGE.write(&mut self.interface, range as u8).map_err(Error::from)
    }

    /// Reads back the accelerometer full-scale range.
    pub fn accel_range(&mut self) -> Result<AccelRange, CommE> {
        let code = ACCEL_RANGE.read(&mut self.interface).map_err(Error::from)?;
        AccelRange::from_bytes(code).map_err(|_| Error::InvalidConfig)
    }

    /// Selects the gyroscope full-scale range.
    pub fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), CommE> {
        GYRO_RANGE.write(&mut self.interface, range as u8).map_err(Error::from)
    }

    /// Selects the motion-detector high-pass filter.
    pub fn set_accel_high_pass(&mut self, filter: HighPassFilter) -> Result<(), CommE> {
        ACCEL_HPF.write(&mut self.interface, filter as u8).map_err(Error::from)
    }

    // ==================================================================
    // == Motion Detection ==============================================
    // ==================================================================
    /// Sets the motion-detection threshold (32 mg/LSB).
    pub fn set_motion_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_MOT_THR, threshold)
            .map_err(Error::from)
    }

    /// Sets how long motion must persist before the event fires (1 ms/LSB).
    pub fn set_motion_duration(&mut self, duration: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_MOT_DUR, duration)
            .map_err(Error::from)
    }

    /// Sets the zero-motion threshold (32 mg/LSB).
    pub fn set_zero_motion_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_ZRMOT_THR, threshold)
            .map_err(Error::from)
    }

    /// Sets how long stillness must persist before the zero-motion event
    /// fires (64 ms/LSB).
    pub fn set_zero_motion_duration(&mut self, duration: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_ZRMOT_DUR, duration)
            .map_err(Error::from)
    }

    /// Drives the interrupt pin active low instead of active high.
    pub fn set_interrupt_active_low(&mut self, enabled: bool) -> Result<(), CommE> {
        INT_ACTIVE_LOW.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Latches the interrupt pin until `INT_STATUS` is read.
    pub fn set_interrupt_latch(&mut self, enabled: bool) -> Result<(), CommE> {
        INT_LATCH.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables or disables the motion interrupt.
    pub fn set_motion_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        MOTION_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables or disables the zero-motion interrupt.
    pub fn set_zero_motion_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        ZERO_MOTION_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables or disables the data-ready interrupt.
    pub fn set_data_ready_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        DATA_READY_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Takes one `INT_STATUS` snapshot.
    ///
    /// The read clears every latched bit, so branch on all relevant flags
    /// of the returned snapshot before reading again.
    pub fn int_status(&mut self) -> Result<IntStatus, CommE> {
        let raw = self
            .interface
            .read_register(REG_INT_STATUS)
            .map_err(Error::from)?;
        Ok(IntStatus::from(raw))
    }

    /// Whether a motion event latched since the last `INT_STATUS` read.
    pub fn motion_seen(&mut self) -> Result<bool, CommE> {
        Ok(self.int_status()?.motion())
    }

    /// Whether a zero-motion event latched since the last `INT_STATUS`
    /// read.
    pub fn zero_motion_seen(&mut self) -> Result<bool, CommE> {
        Ok(self.int_status()?.zero_motion())
    }

    /// Whether a new sample is available.
    pub fn data_ready(&mut self) -> Result<bool, CommE> {
        Ok(self.int_status()?.data_ready())
    }

    /// Blocks until a sample is available, giving up after `budget` polls.
    pub fn wait_data_ready(&mut self, budget: u32) -> Result<(), CommE> {
        poll_until(budget, || self.data_ready())
            .map_err(Error::from)
            .map(|_| ())
    }

    // ==================================================================
    // == Offsets =======================================================
    // ==================================================================
    /// Writes the three 16-bit accelerometer offset registers.
    pub fn set_accel_offsets(&mut self, offsets: [i16; 3]) -> Result<(), CommE> {
        self.write_offset_words(REG_XA_OFFS_H, offsets)
    }

    /// Reads the three 16-bit accelerometer offset registers.
    pub fn accel_offsets(&mut self) -> Result<[i16; 3], CommE> {
        self.read_offset_words(REG_XA_OFFS_H)
    }

    /// Writes the three 16-bit gyroscope offset registers.
    pub fn set_gyro_offsets(&mut self, offsets: [i16; 3]) -> Result<(), CommE> {
        self.write_offset_words(REG_XG_OFFS_USRH, offsets)
    }

    /// Reads the three 16-bit gyroscope offset registers.
    pub fn gyro_offsets(&mut self) -> Result<[i16; 3], CommE> {
        self.read_offset_words(REG_XG_OFFS_USRH)
    }

    fn write_offset_words(&mut self, register: u8, offsets: [i16; 3]) -> Result<(), CommE> {
        let mut raw = [0u8; 6];
        for (axis, offset) in offsets.iter().enumerate() {
            let bytes = offset.to_be_bytes();
            raw[axis * 2] = bytes[0];
            raw[axis * 2 + 1] = bytes[1];
        }
        self.interface.write_many(register, &raw).map_err(Error::from)
    }

    fn read_offset_words(&mut self, register: u8) -> Result<[i16; 3], CommE> {
        let mut raw = [0u8; 6];
        self.interface.read_many(register, &mut raw).map_err(Error::from)?;
        Ok([
            i16::from_be_bytes([raw[0], raw[1]]),
            i16::from_be_bytes([raw[2], raw[3]]),
            i16::from_be_bytes([raw[4], raw[5]]),
        ])
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads a raw acceleration triplet.
    pub fn read_accel(&mut self) -> Result<Sample, CommE> {
        let mut raw = [0u8; RAW_AXIS_BYTES];
        self.interface
            .read_many(REG_ACCEL_XOUT_H, &mut raw)
            .map_err(Error::from)?;
        Ok(Sample::from_be_bytes(raw))
    }

    /// Reads a raw angular-rate triplet.
    pub fn read_gyro(&mut self) -> Result<Sample, CommE> {
        let mut raw = [0u8; RAW_AXIS_BYTES];
        self.interface
            .read_many(REG_GYRO_XOUT_H, &mut raw)
            .map_err(Error::from)?;
        Ok(Sample::from_be_bytes(raw))
    }

    /// Reads acceleration, raw temperature, and angular rate in a single
    /// bus transaction.
    pub fn read_raw_motion(&mut self) -> Result<(Sample, i16, Sample), CommE> {
        let mut raw = [0u8; RAW_MOTION_BYTES];
        self.interface
            .read_many(REG_ACCEL_XOUT_H, &mut raw)
            .map_err(Error::from)?;

        let accel = Sample::from_be_bytes([raw[0], raw[1], raw[2], raw[3], raw[4], raw[5]]);
        let temp = i16::from_be_bytes([raw[6], raw[7]]);
        let gyro = Sample::from_be_bytes([raw[8], raw[9], raw[10], raw[11], raw[12], raw[13]]);
        Ok((accel, temp, gyro))
    }

    /// Reads the die temperature in °C.
    pub fn temperature_c(&mut self) -> Result<f32, CommE> {
        let mut raw = [0u8; 2];
        self.interface
            .read_many(REG_TEMP_OUT_H, &mut raw)
            .map_err(Error::from)?;
        let raw = i16::from_be_bytes(raw);
        // Conversion from the register map documentation.
        Ok(f32::from(raw) / 340.0 + 36.53)
    }
}

impl<IFACE, CommE> MotionSource for Mpu6050<IFACE>
where
    IFACE: RegisterInterface<Error = CommE>,
{
    type Error = Error<CommE>;

    fn arm(&mut self) -> core::result::Result<(), Self::Error> {
        // Two reads make sure every latched INT_STATUS bit is reset.
        let _ = self.int_status()?;
        let _ = self.int_status()?;
        Ok(())
    }

    fn activity(&mut self) -> core::result::Result<bool, Self::Error> {
        self.motion_seen()
    }

    fn inactivity(&mut self) -> core::result::Result<bool, Self::Error> {
        self.zero_motion_seen()
    }

    /// No hardware FIFO is armed in this mode; one sample is drained per
    /// data-ready flag.
    fn drain<const N: usize>(
        &mut self,
        out: &mut Vec<Sample, N>,
    ) -> core::result::Result<usize, Self::Error> {
        if !Mpu6050::data_ready(self)? {
            return Ok(0);
        }

        let sample = self.read_accel()?;
        if out.push(sample).is_ok() {
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

impl<IFACE, CommE> OffsetTarget for Mpu6050<IFACE>
where
    IFACE: RegisterInterface<Error = CommE>,
{
    type Error = Error<CommE>;

    fn data_ready(&mut self) -> core::result::Result<bool, Self::Error> {
        Mpu6050::data_ready(self)
    }

    fn read_sample(&mut self) -> core::result::Result<Sample, Self::Error> {
        self.read_accel()
    }

    fn apply_offsets(&mut self, offsets: [i16; 3]) -> core::result::Result<(), Self::Error> {
        self.set_accel_offsets(offsets)
    }
}
