//! ADXL345 three-axis accelerometer driver.

pub mod params;
pub mod registers;

use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;
use heapless::Vec;
use modular_bitfield::prelude::Specifier;

use crate::calib::{self, OffsetTarget};
use crate::capture::MotionSource;
use crate::error::{Error, Result};
use crate::interface::{I2cInterface, RegisterInterface, SpiInterface};
use crate::poll::poll_until;
use crate::sample::Sample;

use self::params::{DataRate, FifoMode, Range};
use self::registers::{
    ACT_AC_COUPLED,
    ACT_X_ENABLE,
    ACT_Y_ENABLE,
    ACT_Z_ENABLE,
    ACTIVITY_INT_ENABLE,
    AUTO_SLEEP,
    DATA_READY_INT_ENABLE,
    DEVICE_ID,
    FIFO_ENTRIES,
    FIFO_MODE,
    FIFO_SAMPLES,
    FULL_RES,
    INACT_AC_COUPLED,
    INACT_X_ENABLE,
    INACT_Y_ENABLE,
    INACT_Z_ENABLE,
    INACTIVITY_INT_ENABLE,
    IntMap,
    IntSource,
    LINK,
    LOW_POWER,
    MAX_WATERMARK,
    MEASURE,
    OVERRUN_INT_ENABLE,
    RANGE,
    RATE,
    REG_DATAX0,
    REG_DEVID,
    REG_INT_SOURCE,
    REG_OFSX,
    REG_THRESH_ACT,
    REG_THRESH_INACT,
    REG_TIME_INACT,
    WATERMARK_INT_ENABLE,
};

// One offset-register LSB (15.6 mg) is worth four output LSB (3.9 mg) in
// full resolution.
const OFFSET_LSB_RATIO: i32 = 4;
// Number of consecutive bytes spanning X, Y, Z axis samples.
const RAW_AXIS_BYTES: usize = 6;

/// High-level synchronous driver for the ADXL345 accelerometer.
pub struct Adxl345<IFACE> {
    interface: IFACE,
}

impl<IFACE> Adxl345<IFACE> {
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

impl<I2C> Adxl345<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for I2C transports at the default address.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c, registers::I2C_ADDRESS))
    }

    /// Convenience constructor for the ALT-pin-high address.
    pub fn new_i2c_alt(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c, registers::I2C_ADDRESS_ALT))
    }

    /// Releases the driver, returning the I2C bus.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<SPI> Adxl345<SpiInterface<SPI>>
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

impl<IFACE, CommE> Adxl345<IFACE>
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

        let id = self.interface.read_register(REG_DEVID).map_err(Error::from)?;
        if id != DEVICE_ID {
            return Err(Error::DeviceIdMismatch);
        }

        Ok(())
    }

    // ==================================================================
    // == Rate, Range & Power ===========================================
    // ==================================================================
    /// Selects the output data rate.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), CommE> {
        RATE.write(&mut self.interface, rate as u8).map_err(Error::from)
    }

    /// Reads back the configured output data rate.
    pub fn data_rate(&mut self) -> Result<DataRate, CommE> {
        let code = RATE.read(&mut self.interface).map_err(Error::from)?;
        DataRate::from_bytes(code).map_err(|_| Error::InvalidConfig)
    }

    /// Enables or disables the reduced-power sampling mode.
    pub fn set_low_power(&mut self, enabled: bool) -> Result<(), CommE> {
        LOW_POWER.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Selects the measurement range.
    pub fn set_range(&mut self, range: Range) -> Result<(), CommE> {
        RANGE.write(&mut self.interface, range as u8).map_err(Error::from)
    }

    /// Reads back the configured measurement range.
    pub fn range(&mut self) -> Result<Range, CommE> {
        let code = RANGE.read(&mut self.interface).map_err(Error::from)?;
        Range::from_bytes(code).map_err(|_| Error::InvalidConfig)
    }

    /// Enables or disables full-resolution output (fixed 3.9 mg/LSB).
    pub fn set_full_resolution(&mut self, enabled: bool) -> Result<(), CommE> {
        FULL_RES.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Starts or stops measurement.
    pub fn set_measure(&mut self, enabled: bool) -> Result<(), CommE> {
        MEASURE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Serializes the activity and inactivity detectors.
    pub fn set_link(&mut self, enabled: bool) -> Result<(), CommE> {
        LINK.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables automatic sleep after inactivity (requires link mode).
    pub fn set_auto_sleep(&mut self, enabled: bool) -> Result<(), CommE> {
        AUTO_SLEEP.write(&mut self.interface, enabled).map_err(Error::from)
    }

    // ==================================================================
    // == Offsets =======================================================
    // ==================================================================
    /// Writes the three offset registers (15.6 mg/LSB each).
    pub fn set_offsets(&mut self, offsets: [i8; 3]) -> Result<(), CommE> {
        let raw = [offsets[0] as u8, offsets[1] as u8, offsets[2] as u8];
        self.interface.write_many(REG_OFSX, &raw).map_err(Error::from)
    }

    /// Reads the three offset registers.
    pub fn offsets(&mut self) -> Result<[i8; 3], CommE> {
        let mut raw = [0u8; 3];
        self.interface.read_many(REG_OFSX, &mut raw).map_err(Error::from)?;
        Ok([raw[0] as i8, raw[1] as i8, raw[2] as i8])
    }

    /// Averages `samples` resting readings and programs the negated mean
    /// into the offset registers. The device must be stationary.
    pub fn calibrate(&mut self, samples: u32, poll_budget: u32) -> Result<[i16; 3], CommE> {
        calib::calibrate_by_averaging(self, samples, OFFSET_LSB_RATIO, poll_budget)
            .map_err(Error::from)
    }

    // ==================================================================
    // == Activity / Inactivity Detection ===============================
    // ==================================================================
    /// Sets the activity threshold (62.5 mg/LSB).
    pub fn set_activity_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_THRESH_ACT, threshold)
            .map_err(Error::from)
    }

    /// Sets the inactivity threshold (62.5 mg/LSB).
    pub fn set_inactivity_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_THRESH_INACT, threshold)
            .map_err(Error::from)
    }

    /// Sets how long the signal must stay below the inactivity threshold
    /// before the event fires (1 s/LSB).
    pub fn set_inactivity_time(&mut self, seconds: u8) -> Result<(), CommE> {
        self.interface
            .write_register(REG_TIME_INACT, seconds)
            .map_err(Error::from)
    }

    /// Selects which axes participate in activity detection.
    pub fn set_activity_axes(&mut self, x: bool, y: bool, z: bool) -> Result<(), CommE> {
        ACT_X_ENABLE.write(&mut self.interface, x).map_err(Error::from)?;
        ACT_Y_ENABLE.write(&mut self.interface, y).map_err(Error::from)?;
        ACT_Z_ENABLE.write(&mut self.interface, z).map_err(Error::from)
    }

    /// Selects which axes participate in inactivity detection.
    pub fn set_inactivity_axes(&mut self, x: bool, y: bool, z: bool) -> Result<(), CommE> {
        INACT_X_ENABLE.write(&mut self.interface, x).map_err(Error::from)?;
        INACT_Y_ENABLE.write(&mut self.interface, y).map_err(Error::from)?;
        INACT_Z_ENABLE.write(&mut self.interface, z).map_err(Error::from)
    }

    /// Switches activity detection between dc- and ac-coupled comparison.
    pub fn set_activity_ac_coupled(&mut self, enabled: bool) -> Result<(), CommE> {
        ACT_AC_COUPLED.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Switches inactivity detection between dc- and ac-coupled comparison.
    pub fn set_inactivity_ac_coupled(&mut self, enabled: bool) -> Result<(), CommE> {
        INACT_AC_COUPLED.write(&mut self.interface, enabled).map_err(Error::from)
    }

    // ==================================================================
    // == Interrupts ====================================================
    // ==================================================================
    /// Enables or disables the activity interrupt.
    pub fn set_activity_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        ACTIVITY_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables or disables the inactivity interrupt.
    pub fn set_inactivity_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        INACTIVITY_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables or disables the FIFO watermark interrupt.
    pub fn set_watermark_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        WATERMARK_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables or disables the FIFO overrun interrupt.
    pub fn set_overrun_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        OVERRUN_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Enables or disables the data-ready interrupt.
    pub fn set_data_ready_interrupt(&mut self, enabled: bool) -> Result<(), CommE> {
        DATA_READY_INT_ENABLE.write(&mut self.interface, enabled).map_err(Error::from)
    }

    /// Routes each interrupt source to the INT1 or INT2 pin.
    pub fn set_interrupt_map(&mut self, map: IntMap) -> Result<(), CommE> {
        self.interface
            .write_register(registers::REG_INT_MAP, u8::from(map))
            .map_err(Error::from)
    }

    /// Takes one `INT_SOURCE` snapshot.
    ///
    /// The read clears the latched event bits, so branch on all relevant
    /// flags of the returned snapshot before reading again.
    pub fn int_source(&mut self) -> Result<IntSource, CommE> {
        let raw = self
            .interface
            .read_register(REG_INT_SOURCE)
            .map_err(Error::from)?;
        Ok(IntSource::from(raw))
    }

    /// Whether an activity event latched since the last `INT_SOURCE` read.
    pub fn activity_seen(&mut self) -> Result<bool, CommE> {
        Ok(self.int_source()?.activity())
    }

    /// Whether an inactivity event latched since the last `INT_SOURCE` read.
    pub fn inactivity_seen(&mut self) -> Result<bool, CommE> {
        Ok(self.int_source()?.inactivity())
    }

    /// Whether a new sample is available.
    pub fn data_ready(&mut self) -> Result<bool, CommE> {
        Ok(self.int_source()?.data_ready())
    }

    /// Blocks until a sample is available, giving up after `budget` polls.
    pub fn wait_data_ready(&mut self, budget: u32) -> Result<(), CommE> {
        poll_until(budget, || self.data_ready())
            .map_err(Error::from)
            .map(|_| ())
    }

    // ==================================================================
    // == Data Acquisition & FIFO =======================================
    // ==================================================================
    /// Reads a raw acceleration triplet.
    pub fn read_xyz(&mut self) -> Result<Sample, CommE> {
        let mut raw = [0u8; RAW_AXIS_BYTES];
        self.interface.read_many(REG_DATAX0, &mut raw).map_err(Error::from)?;
        Ok(Sample::from_le_bytes(raw))
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

    /// Sets the watermark sample count (at most 31).
    pub fn set_watermark(&mut self, samples: u8) -> Result<(), CommE> {
        if samples > MAX_WATERMARK {
            return Err(Error::InvalidConfig);
        }

        FIFO_SAMPLES.write(&mut self.interface, samples).map_err(Error::from)
    }

    /// Returns the number of samples currently buffered in the FIFO.
    pub fn fifo_entries(&mut self) -> Result<u8, CommE> {
        FIFO_ENTRIES.read(&mut self.interface).map_err(Error::from)
    }

    /// Moves every buffered FIFO sample into `out`, returning how many were
    /// appended.
    ///
    /// Exactly as many burst reads are issued as the entry counter reports:
    /// over-reading an empty FIFO yields undefined data and under-reading
    /// leaves stale samples for the next window. Samples read after `out`
    /// fills are popped from the FIFO but dropped.
    pub fn drain_fifo<const N: usize>(
        &mut self,
        out: &mut Vec<Sample, N>,
    ) -> Result<usize, CommE> {
        let available = self.fifo_entries()?;
        let mut appended = 0;

        for _ in 0..available {
            let sample = self.read_xyz()?;
            if out.push(sample).is_ok() {
                appended += 1;
            }
        }

        Ok(appended)
    }

    /// Flushes the FIFO to a known-empty state by cycling it through bypass
    /// mode, then restores the previous mode.
    pub fn clear_fifo(&mut self) -> Result<(), CommE> {
        let mode = self.fifo_mode()?;
        self.set_fifo_mode(FifoMode::Bypass)?;
        self.set_fifo_mode(mode)
    }
}

impl<IFACE, CommE> MotionSource for Adxl345<IFACE>
where
    IFACE: RegisterInterface<Error = CommE>,
{
    type Error = Error<CommE>;

    fn arm(&mut self) -> core::result::Result<(), Self::Error> {
        self.clear_fifo()?;
        // Two reads make sure every latched INT_SOURCE bit is reset.
        let _ = self.int_source()?;
        let _ = self.int_source()?;
        Ok(())
    }

    fn activity(&mut self) -> core::result::Result<bool, Self::Error> {
        self.activity_seen()
    }

    fn inactivity(&mut self) -> core::result::Result<bool, Self::Error> {
        self.inactivity_seen()
    }

    fn drain<const N: usize>(
        &mut self,
        out: &mut Vec<Sample, N>,
    ) -> core::result::Result<usize, Self::Error> {
        self.drain_fifo(out)
    }
}

impl<IFACE, CommE> OffsetTarget for Adxl345<IFACE>
where
    IFACE: RegisterInterface<Error = CommE>,
{
    type Error = Error<CommE>;

    fn data_ready(&mut self) -> core::result::Result<bool, Self::Error> {
        Adxl345::data_ready(self)
    }

    fn read_sample(&mut self) -> core::result::Result<Sample, Self::Error> {
        self.read_xyz()
    }

    fn apply_offsets(&mut self, offsets: [i16; 3]) -> core::result::Result<(), Self::Error> {
        let clamp = |value: i16| value.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8;
        self.set_offsets([clamp(offsets[0]), clamp(offsets[1]), clamp(offsets[2])])
    }
}
