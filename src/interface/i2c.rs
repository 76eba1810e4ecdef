//! I2C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{Error as I2cError, ErrorKind, I2c, Operation};

use super::RegisterInterface;

/// I2C-based register interface bound to one device address.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface for the device at `address`.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Returns the device address this interface talks to.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterInterface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        self.i2c.write_read(self.address, &[register], buf)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let pointer = [register];
        let mut operations = [Operation::Write(&pointer), Operation::Write(data)];
        self.i2c.transaction(self.address, &mut operations)
    }

    /// Empty write to the device address; a NACK means nothing is listening
    /// there.
    fn probe(&mut self) -> core::result::Result<bool, Self::Error> {
        match self.i2c.write(self.address, &[]) {
            Ok(()) => Ok(true),
            Err(err) if matches!(err.kind(), ErrorKind::NoAcknowledge(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::NoAcknowledgeSource;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
    use std::vec;

    #[test]
    fn write_register_sends_address_and_value() {
        let expectations = [Transaction::write(0x53, vec![0x2C, 0x0A])];
        let mut interface = I2cInterface::new(Mock::new(&expectations), 0x53);

        interface.write_register(0x2C, 0x0A).unwrap();
        interface.release().done();
    }

    #[test]
    fn read_register_issues_a_pointer_write_then_read() {
        let expectations = [Transaction::write_read(0x53, vec![0x30], vec![0x83])];
        let mut interface = I2cInterface::new(Mock::new(&expectations), 0x53);

        assert_eq!(interface.read_register(0x30).unwrap(), 0x83);
        interface.release().done();
    }

    #[test]
    fn read_many_fills_the_whole_buffer_from_one_transfer() {
        let expectations = [Transaction::write_read(
            0x53,
            vec![0x32],
            vec![0x01, 0x00, 0xFE, 0xFF, 0x00, 0x01],
        )];
        let mut interface = I2cInterface::new(Mock::new(&expectations), 0x53);

        let mut buf = [0u8; 6];
        interface.read_many(0x32, &mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x00, 0xFE, 0xFF, 0x00, 0x01]);
        interface.release().done();
    }

    #[test]
    fn write_many_chains_pointer_and_payload_in_one_transaction() {
        let expectations = [
            Transaction::transaction_start(0x68),
            Transaction::write(0x68, vec![0x06]),
            Transaction::write(0x68, vec![0xFB, 0xC6]),
            Transaction::transaction_end(0x68),
        ];
        let mut interface = I2cInterface::new(Mock::new(&expectations), 0x68);

        interface.write_many(0x06, &[0xFB, 0xC6]).unwrap();
        interface.release().done();
    }

    #[test]
    fn probe_reports_presence_from_the_acknowledge_bit() {
        let expectations = [Transaction::write(0x18, vec![])];
        let mut interface = I2cInterface::new(Mock::new(&expectations), 0x18);
        assert!(interface.probe().unwrap());
        interface.release().done();

        let expectations = [Transaction::write(0x18, vec![]).with_error(
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
        )];
        let mut interface = I2cInterface::new(Mock::new(&expectations), 0x18);
        assert!(!interface.probe().unwrap());
        interface.release().done();
    }

    #[test]
    fn probe_propagates_non_nack_errors() {
        let expectations =
            [Transaction::write(0x18, vec![]).with_error(ErrorKind::ArbitrationLoss)];
        let mut interface = I2cInterface::new(Mock::new(&expectations), 0x18);
        assert!(interface.probe().is_err());
        interface.release().done();
    }

    #[test]
    fn empty_transfers_do_not_touch_the_bus() {
        let mut interface = I2cInterface::new(Mock::new(&[]), 0x53);
        interface.read_many(0x32, &mut []).unwrap();
        interface.write_many(0x32, &[]).unwrap();
        interface.release().done();
    }
}
