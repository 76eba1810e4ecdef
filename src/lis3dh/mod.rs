//! LIS3DH three-axis accelerometer driver.

pub mod params;
pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;
use heapless::Vec;
use modular_bitfield::prelude::Specifier;

use crate::error::{Error, Result};
use crate::interface::{I2cInterface, RegisterInterface, SpiInterface};
use crate::poll::poll_until;
use crate::sample::{Axis, Sample};

use self::params::{DataRate, FifoMode, FullScale};
use self::registers::{
    ADC_ENABLE,
    AUTO_INCREMENT,
    AXES_ENABLE,
    BLOCK_DATA_UPDATE,
    BOOT,
    DEVICE_ID,
    FIFO_DEPTH,
    FIFO_ENABLE,
    FIFO_MODE,
    FIFO_THRESHOLD,
    FULL_SCALE,
    FifoSrc,
    HIGH_RESOLUTION,
    INT1_ROUTE_IA1,
    INT1_ROUTE_OVERRUN,
    INT1_ROUTE_WATERMARK,
    Int1Cfg,
    Int1Src,
    LATCH_INT1,
    LOW_POWER,
    MAX_INT1_THRESHOLD,
    MAX_THRESHOLD,
    ODR,
    REG_FIFO_SRC,
    REG_INT1_CFG,
    REG_INT1_DURATION,
    REG_INT1_SRC,
    REG_INT1_THS,
    REG_OUT_ADC3_L,
    REG_OUT_X_L,
    REG_STATUS,
    REG_WHO_AM_I,
    Status,
    TEMP_ENABLE,
};

// Reboot-to-register-access settle time (milliseconds).
const BOOT_SETTLE_MS: u32 = 5;
// Number of consecutive bytes spanning X, Y, Z axis samples.
const RAW_AXIS_BYTES: usize = 6;

/// High-level synchronous driver for the LIS3DH accelerometer.
pub struct Lis3dh<IFACE> {
    interface: IFACE,
    // The on-chip sensor reports temperature relative to an unspecified
    // reference; callers supply the absolute anchor measured externally.
    temperature_reference: i16,
}

impl<IFACE> Lis3dh<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE) -> Self {
        Self {
            interface,
            temperature_reference: 0,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Anchors the relative temperature output to an externally measured
    /// value.
    pub fn set_temperature_reference(&mut self, reference: i16) {
        self.temperature_reference = reference;
    }
}

impl<I2C> Lis3dh<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for I2C transports at the default address.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c, registers::I2C_ADDRESS))
    }

    /// Convenience constructor for the SA0-high address.
    pub fn new_i2c_alt(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c, registers::I2C_ADDRESS_ALT))
    }

    /// Releases the driver, returning the I2C bus.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<SPI> Lis3dh<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI) -> Self {
        Self::new(SpiInterface::new(spi))
    }

    /// Releases the driver, returning the SPI device.
    pub fn release_spi(self) -> SPI {
        self.release().release()
    }
}

impl<IFACE, CommE> Lis3dh<IFACE>
where
    IFACE: RegisterInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Identification ===============================
    // ==================================================================
    /// Checks that the device answers at its address and carries the
    /// expected chip ID.
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

        Ok(())
    }

    /// Reloads the trimming parameters from non-volatile memory and waits
    /// for register access to settle.
    pub fn reboot(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        BOOT.write(&mut self.interface, true).map_err(Error::from)?;
        delay.delay_ms(BOOT_SETTLE_MS);
        Ok(())
    }

    // ==================================================================
    // == Rate, Scale & Axes ============================================
    // ==================================================================
    /// Selects the output data rate.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), CommE> {
        ODR.write(&mut self.interface, rate as u8).map_err(Error::from)
    }

    /// Reads back the configured output data rate.
    pub fn data_rate(&mut self) -> Result<DataRate, CommE> {
        let code = ODR.read(&mut self.interface).map_err(Error::from)?;
        DataRate::from_bytes(code).map_err(|_| Error::InvalidConfig)
    }

    /// Enables or disables low-power (8-bit) mode.
    pub fn set_low_power(&mut self, enabled: bool) -> Result<(), CommE> {
        LOW_POWER.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Selects which axes are measured.
    pub fn enable_axes(&mut self, x: bool, y: bool, z: bool) -> Result<(), CommE> {
        let bits = u8::from(x) | (u8::from(y) << 1) | (u8::from(z) << 2);
        AXES_ENABLE.write(&mut self.interface, bits).map_err(Error::from)
    }

    /// Enables or disables high-resolution (12-bit) output.
    pub fn set_high_resolution(&mut self, enabled: bool) -> Result<(), CommE> {
        HIGH_RESOLUTION.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Selects the full-scale range.
    pub fn set_full_scale(&mut self, scale: FullScale) -> Result<(), CommE> {
        FULL_SCALE.write(&mut self.interface, scale as u8).map_err(Error::from)
    }

    /// Reads back the configured full-scale range.
    pub fn full_scale(&mut self) -> Result<FullScale, CommE> {
        let code = FULL_SCALE.read(&mut self.interface).map_err(Error::from)?;
        FullScale::from_bytes(code).map_err(|_| Error::InvalidConfig)
    }

    /// Holds output registers stable between the low and high byte reads of
    /// one sample.
    pub fn set_block_data_update(&mut self, enabled: bool) -> Result<(), CommE> {
        BLOCK_DATA_UPDATE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    // ==================================================================
    // == Status & Data Acquisition =====================================
    // ==================================================================
    /// Takes one `STATUS_REG` snapshot.
    pub fn status(&mut self) -> Result<Status, CommE> {
        let raw = self.interface.read_register(REG_STATUS).map_err(Error::from)?;
        Ok(Status::from(raw))
    }

    /// Whether a full sample is available on all enabled axes.
    pub fn xyz_available(&mut self) -> Result<bool, CommE> {
        Ok(self.status()?.xyz_available())
    }

    /// Blocks until a full sample is available, giving up after `budget`
    /// polls.
    pub fn wait_xyz_available(&mut self, budget: u32) -> Result<(), CommE> {
        poll_until(budget, || self.xyz_available())
            .map_err(Error::from)
            .map(|_| ())
    }

    /// Reads a raw acceleration triplet.
    pub fn read_xyz(&mut self) -> Result<Sample, CommE> {
        let mut raw = [0u8; RAW_AXIS_BYTES];
        self.interface
            .read_many(REG_OUT_X_L | AUTO_INCREMENT, &mut raw)
            .map_err(Error::from)?;
        Ok(Sample::from_le_bytes(raw))
    }

    /// Reads a single axis as a raw signed word.
    pub fn read_axis(&mut self, axis: Axis) -> Result<i16, CommE> {
        let register = match axis {
            Axis::X => REG_OUT_X_L,
            Axis::Y => REG_OUT_X_L + 2,
            Axis::Z => REG_OUT_X_L + 4,
        };
        let raw = self
            .interface
            .read_word(register | AUTO_INCREMENT)
            .map_err(Error::from)?;
        Ok(raw as i16)
    }

    /// Reads one sample scaled to g using the configured full-scale range.
    pub fn read_xyz_g(&mut self) -> Result<[f32; 3], CommE> {
        let divisor = self.full_scale()?.divisor();
        let raw = self.read_xyz()?;
        Ok([
            f32::from(raw.x) / divisor,
            f32::from(raw.y) / divisor,
            f32::from(raw.z) / divisor,
        ])
    }

    // ==================================================================
    // == FIFO ==========================================================
    // ==================================================================
    /// Enables or disables the FIFO engine.
    pub fn set_fifo_enable(&mut self, enabled: bool) -> Result<(), CommE> {
        FIFO_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Selects the FIFO operating mode.
    pub fn set_fifo_mode(&mut self, mode: FifoMode) -> Result<(), CommE> {
        FIFO_MODE.write(&mut self.interface, mode as u8).map_err(Error::from)
    }

    /// Reads back the FIFO operating mode.
    pub fn fifo_mode(&mut self) -> Result<FifoMode, CommE> {
        let code = FIFO_MODE.read(&mut self.interface).map_err(Error::from)?;
        FifoMode::from_bytes(code).map_err(|_| Error::InvalidConfig)
    }

    /// Sets the watermark threshold (at most 31).
    pub fn set_fifo_threshold(&mut self, samples: u8) -> Result<(), CommE> {
        if samples > MAX_THRESHOLD {
            return Err(Error::InvalidConfig);
        }

        FIFO_THRESHOLD.write(&mut self.interface, samples).map_err(Error::from)
    }

    /// Takes one `FIFO_SRC_REG` snapshot.
    pub fn fifo_src(&mut self) -> Result<FifoSrc, CommE> {
        let raw = self
            .interface
            .read_register(REG_FIFO_SRC)
            .map_err(Error::from)?;
        Ok(FifoSrc::from(raw))
    }

    /// Returns the number of unread samples buffered in the FIFO.
    pub fn fifo_samples(&mut self) -> Result<u8, CommE> {
        Ok(self.fifo_src()?.samples())
    }

    /// Moves every buffered FIFO sample into `out`, returning how many were
    /// appended.
    ///
    /// Exactly as many burst reads are issued as the sample counter
    /// reports. Samples read after `out` fills are popped but dropped.
    pub fn drain_fifo<const N: usize>(
        &mut self,
        out: &mut Vec<Sample, N>,
    ) -> Result<usize, CommE> {
        let available = self.fifo_samples()?;
        let mut appended = 0;

        for _ in 0..available {
            let sample = self.read_xyz()?;
            if out.push(sample).is_ok() {
                appended += 1;
            }
        }

        Ok(appended)
    }

    /// Flushes the FIFO to a known-empty state: one dummy read clears the
    /// data flags, a bypass cycle resets the buffer, and any straggling
    /// samples are drained before the previous mode is restored.
    pub fn clear_fifo(&mut self) -> Result<(), CommE> {
        let _ = self.read_xyz()?;
        let mode = self.fifo_mode()?;
        self.set_fifo_mode(FifoMode::Bypass)?;

        for _ in 0..FIFO_DEPTH {
            if self.fifo_samples()? == 0 {
                break;
            }
            let _ = self.read_xyz()?;
        }

        self.set_fifo_mode(mode)
    }

    // ==================================================================
    // == INT1 Events ===================================================
    // ==================================================================
    /// Programs the INT1 high-g activity engine: threshold (at most 127,
    /// in range-dependent LSB), minimum event duration (in ODR periods),
    /// and high events on all three axes.
    pub fn configure_int1_activity(&mut self, threshold: u8, duration: u8) -> Result<(), CommE> {
        if threshold > MAX_INT1_THRESHOLD {
            return Err(Error::InvalidConfig);
        }

        self.interface
            .write_register(REG_INT1_THS, threshold)
            .map_err(Error::from)?;
        self.interface
            .write_register(REG_INT1_DURATION, duration)
            .map_err(Error::from)?;
        self.set_int1_cfg(Int1Cfg::high_events_all_axes())
    }

    /// Writes an arbitrary INT1 event configuration.
    pub fn set_int1_cfg(&mut self, cfg: Int1Cfg) -> Result<(), CommE> {
        self.interface
            .write_register(REG_INT1_CFG, u8::from(cfg))
            .map_err(Error::from)
    }

    /// Takes one `INT1_SRC` snapshot; reading releases a latched interrupt.
    pub fn int1_source(&mut self) -> Result<Int1Src, CommE> {
        let raw = self
            .interface
            .read_register(REG_INT1_SRC)
            .map_err(Error::from)?;
        Ok(Int1Src::from(raw))
    }

    /// Latches INT1 until `INT1_SRC` is read.
    pub fn set_int1_latch(&mut self, enabled: bool) -> Result<(), CommE> {
        LATCH_INT1.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Routes IA1 activity events to the INT1 pin.
    pub fn route_activity_to_int1(&mut self, enabled: bool) -> Result<(), CommE> {
        INT1_ROUTE_IA1.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Routes the FIFO watermark to the INT1 pin.
    pub fn route_watermark_to_int1(&mut self, enabled: bool) -> Result<(), CommE> {
        INT1_ROUTE_WATERMARK.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Routes the FIFO overrun to the INT1 pin.
    pub fn route_overrun_to_int1(&mut self, enabled: bool) -> Result<(), CommE> {
        INT1_ROUTE_OVERRUN.write(&mut self.interface, enabled).map_err(Error::from)
    }

    // ==================================================================
    // == Temperature ===================================================
    // ==================================================================
    /// Powers the auxiliary ADC and the temperature channel.
    pub fn enable_temperature(&mut self) -> Result<(), CommE> {
        ADC_ENABLE.write(&mut self.interface, true).map_err(Error::from)?;
        TEMP_ENABLE.write(&mut self.interface, true).map_err(Error::from)
    }

    /// Reads the raw relative temperature (1 °C/LSB, sign in the high
    /// byte of ADC channel 3).
    pub fn raw_temperature(&mut self) -> Result<i16, CommE> {
        let mut raw = [0u8; 2];
        self.interface
            .read_many(REG_OUT_ADC3_L | AUTO_INCREMENT, &mut raw)
            .map_err(Error::from)?;
        Ok(i16::from(raw[1] as i8))
    }

    /// Reads the temperature anchored to the configured reference.
    pub fn temperature(&mut self) -> Result<i16, CommE> {
        Ok(self.raw_temperature()? + self.temperature_reference)
    }
}
