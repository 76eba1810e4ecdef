//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.
//!
//! Uses the command-byte convention shared by the ADXL345 and LIS3DH: bit 7
//! selects read, bit 6 selects multi-byte (auto-incrementing) access, and
//! the low six bits carry the register address.

use embedded_hal::spi::{Operation, SpiDevice};

use super::RegisterInterface;

const READ: u8 = 0x80;
const MULTI_BYTE: u8 = 0x40;

/// SPI-based register interface.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    fn command_byte(register: u8, is_read: bool, multi: bool) -> u8 {
        let mut command = register & 0x3F;
        if is_read {
            command |= READ;
        }
        if multi {
            command |= MULTI_BYTE;
        }
        command
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> RegisterInterface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        let frame = [Self::command_byte(register, false, false), value];
        self.spi.write(&frame)
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let command = [Self::command_byte(register, true, false)];
        let mut value = [0u8; 1];
        let mut operations = [Operation::Write(&command), Operation::Read(&mut value)];
        self.spi.transaction(&mut operations)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, true, buf.len() > 1)];
        let mut operations = [Operation::Write(&command), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, false, data.len() > 1)];
        let mut operations = [Operation::Write(&command), Operation::Write(data)];
        self.spi.transaction(&mut operations)
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::RegisterInterface;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

    struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [TransactionExpectation<'a>]) -> Self {
            Self {
                expectations,
                index: 0,
            }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            match *expected {
                TransactionExpectation::Read { command, response } => {
                    assert_eq!(operations.len(), 2, "expected write+read operations");
                    let (first, rest) = operations.split_first_mut().expect("missing first op");
                    match first {
                        Operation::Write(data) => {
                            assert_eq!(data.len(), 1, "command length mismatch");
                            assert_eq!(data[0], command, "command byte mismatch");
                        }
                        _ => panic!("first operation must be write"),
                    }

                    let second = rest.first_mut().expect("missing second op");
                    match second {
                        Operation::Read(buf) => {
                            assert_eq!(buf.len(), response.len(), "response length mismatch");
                            buf.copy_from_slice(response);
                        }
                        _ => panic!("second operation must be read"),
                    }
                }
                TransactionExpectation::Write { command, payload } => {
                    assert_eq!(operations.len(), 2, "expected write+write operations");
                    let (first, rest) = operations.split_first_mut().expect("missing first op");
                    match first {
                        Operation::Write(data) => {
                            assert_eq!(data.len(), 1, "command length mismatch");
                            assert_eq!(data[0], command, "command byte mismatch");
                        }
                        _ => panic!("first operation must be write"),
                    }

                    let second = rest.first_mut().expect("missing second op");
                    match second {
                        Operation::Write(data) => {
                            assert_eq!(*data, payload, "payload mismatch");
                        }
                        _ => panic!("second operation must be write"),
                    }
                }
                TransactionExpectation::PlainWrite { .. } => {
                    panic!("expected a transaction, got a plain write")
                }
            }

            Ok(())
        }

        fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI write");
            self.index += 1;

            match *expected {
                TransactionExpectation::PlainWrite { frame } => {
                    assert_eq!(buf, frame, "frame mismatch");
                }
                _ => panic!("expected a plain write"),
            }

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum TransactionExpectation<'a> {
        Read { command: u8, response: &'a [u8] },
        Write { command: u8, payload: &'a [u8] },
        PlainWrite { frame: &'a [u8] },
    }

    #[test]
    fn single_register_read_sets_only_the_read_bit() {
        let expectations = [TransactionExpectation::Read {
            command: 0x80 | 0x30,
            response: &[0x5A],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        assert_eq!(interface.read_register(0x30).unwrap(), 0x5A);
    }

    #[test]
    fn burst_read_sets_read_and_multi_byte_bits() {
        let expectations = [TransactionExpectation::Read {
            command: 0x80 | 0x40 | 0x32,
            response: &[0xAA, 0x55, 0x01, 0x00, 0xFE, 0xFF],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        let mut buf = [0u8; 6];
        interface.read_many(0x32, &mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0x55, 0x01, 0x00, 0xFE, 0xFF]);
    }

    #[test]
    fn single_register_write_keeps_command_bits_clear() {
        let expectations = [TransactionExpectation::PlainWrite {
            frame: &[0x2C, 0x0A],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_register(0x2C, 0x0A).unwrap();
    }

    #[test]
    fn burst_write_sets_the_multi_byte_bit() {
        let expectations = [TransactionExpectation::Write {
            command: 0x40 | 0x1E,
            payload: &[0x12, 0x34, 0x56],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_many(0x1E, &[0x12, 0x34, 0x56]).unwrap();
    }

    #[test]
    fn empty_transfers_are_ignored() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.read_many(0x32, &mut []).unwrap();
        interface.write_many(0x32, &[]).unwrap();
    }
}
