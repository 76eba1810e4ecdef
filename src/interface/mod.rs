//! Bus interface abstraction shared by all drivers in the crate.

pub mod i2c;
pub mod spi;

pub use i2c::I2cInterface;
pub use spi::SpiInterface;

/// Abstraction over the low-level register bus access required by the
/// drivers.
///
/// Concrete implementations exist per bus kind; the drivers depend only on
/// this trait.
pub trait RegisterInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads multiple consecutive registers into the provided buffer.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes multiple consecutive registers from the provided buffer.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Reads a little-endian 16-bit word starting at `register`.
    fn read_word(&mut self, register: u8) -> core::result::Result<u16, Self::Error> {
        let mut raw = [0u8; 2];
        self.read_many(register, &mut raw)?;
        Ok(u16::from_le_bytes(raw))
    }

    /// Checks whether a device is present on the bus.
    ///
    /// Defaults to `true` for transports without an acknowledge mechanism;
    /// the I2C implementation overrides this with an address probe.
    fn probe(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(true)
    }
}
