//! Internal trace output, compiled in only with the `defmt` feature.

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    }};
}

pub(crate) use trace;
