//! Error handling primitives shared by all drivers in the crate.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// No device acknowledged at the expected bus address.
    DeviceNotResponding,
    /// The identification register did not match the expected chip ID.
    DeviceIdMismatch,
    /// The provided configuration value is out of range for its register field.
    InvalidConfig,
    /// A runtime-built bit-field descriptor does not fit inside one register.
    InvalidFieldDescriptor,
    /// A ready condition was not observed within the polling budget.
    PollTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}

impl<E> From<crate::poll::PollError<Error<E>>> for Error<E> {
    fn from(err: crate::poll::PollError<Error<E>>) -> Self {
        match err {
            crate::poll::PollError::Source(inner) => inner,
            crate::poll::PollError::Timeout => Self::PollTimeout,
        }
    }
}
