//! Activity-gated gesture capture.
//!
//! The capture loop has two states. Idle: poll the activity condition under
//! a give-up budget. Active: drain buffered readings every iteration until
//! the inactivity condition asserts, then hand the accumulated window back
//! to the caller. One call captures one window; callers loop for repeated
//! gestures.

use core::fmt;

use heapless::Vec;

use crate::log::trace;
use crate::poll::{PollError, poll_until};
use crate::sample::Sample;

/// Sensor-side hooks the capture loop drives.
///
/// Implementations decide what "activity" means for their chip (latched
/// interrupt source bit, motion status flag) and how a drain maps to the
/// hardware (FIFO burst, single data-ready sample).
pub trait MotionSource {
    /// Error type produced by the underlying driver.
    type Error;

    /// Prepares the sensor for a new window: flush stale FIFO contents and
    /// clear latched event bits so the window starts from a known-empty
    /// state.
    fn arm(&mut self) -> core::result::Result<(), Self::Error>;

    /// Polls the activity condition. Reading the backing status register
    /// may clear its latched bits; the loop calls this at most once per
    /// iteration.
    fn activity(&mut self) -> core::result::Result<bool, Self::Error>;

    /// Polls the inactivity condition that ends a window.
    fn inactivity(&mut self) -> core::result::Result<bool, Self::Error>;

    /// Moves all currently buffered readings into `out`, returning how many
    /// were appended. Must never read more entries than the device reports
    /// as available.
    fn drain<const N: usize>(
        &mut self,
        out: &mut Vec<Sample, N>,
    ) -> core::result::Result<usize, Self::Error>;
}

/// Tuning for [`capture_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Maximum number of idle polls to wait for activity before giving up.
    pub poll_budget: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_budget: crate::poll::DEFAULT_POLL_BUDGET,
        }
    }
}

/// Captures one gesture window into `window`, returning the sample count.
///
/// Waits for activity under the configured poll budget (a silent sensor
/// yields [`PollError::Timeout`]), then drains readings until inactivity.
/// If `window` fills before inactivity asserts, the window is finalized
/// early with the samples collected so far.
pub fn capture_window<S, const N: usize>(
    source: &mut S,
    config: &CaptureConfig,
    window: &mut Vec<Sample, N>,
) -> core::result::Result<usize, PollError<S::Error>>
where
    S: MotionSource,
{
    window.clear();
    source.arm()?;

    poll_until(config.poll_budget, || source.activity())?;
    trace!("capture: activity seen");

    loop {
        source.drain(window)?;
        if window.is_full() {
            trace!("capture: window full");
            break;
        }
        if source.inactivity()? {
            trace!("capture: inactivity seen");
            break;
        }
    }

    Ok(window.len())
}

/// Output encoding for [`write_samples`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed decimal triples.
    Decimal,
    /// Two's-complement hexadecimal triples.
    Hex,
}

/// Writes samples one per line as comma-separated triples, the layout the
/// training-data tooling ingests.
pub fn write_samples<W>(
    out: &mut W,
    samples: &[Sample],
    format: SampleFormat,
) -> fmt::Result
where
    W: fmt::Write,
{
    for sample in samples {
        match format {
            SampleFormat::Decimal => {
                writeln!(out, "{:4}, {:4}, {:4}", sample.x, sample.y, sample.z)?
            }
            SampleFormat::Hex => writeln!(
                out,
                "{:04x}, {:04x}, {:04x}",
                sample.x as u16, sample.y as u16, sample.z as u16
            )?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::string::String;
    use std::vec::Vec as StdVec;

    struct ScriptedSource {
        armed: u32,
        activity: VecDeque<bool>,
        inactivity: VecDeque<bool>,
        batches: VecDeque<StdVec<Sample>>,
    }

    impl ScriptedSource {
        fn new(
            activity: &[bool],
            inactivity: &[bool],
            batches: &[&[Sample]],
        ) -> Self {
            Self {
                armed: 0,
                activity: activity.iter().copied().collect(),
                inactivity: inactivity.iter().copied().collect(),
                batches: batches.iter().map(|b| b.to_vec()).collect(),
            }
        }
    }

    impl MotionSource for ScriptedSource {
        type Error = &'static str;

        fn arm(&mut self) -> Result<(), Self::Error> {
            self.armed += 1;
            Ok(())
        }

        fn activity(&mut self) -> Result<bool, Self::Error> {
            Ok(self.activity.pop_front().unwrap_or(false))
        }

        fn inactivity(&mut self) -> Result<bool, Self::Error> {
            Ok(self.inactivity.pop_front().unwrap_or(false))
        }

        fn drain<const N: usize>(
            &mut self,
            out: &mut Vec<Sample, N>,
        ) -> Result<usize, Self::Error> {
            let batch = self.batches.pop_front().unwrap_or_default();
            let mut appended = 0;
            for sample in batch {
                if out.push(sample).is_err() {
                    break;
                }
                appended += 1;
            }
            Ok(appended)
        }
    }

    #[test]
    fn accumulates_samples_until_inactivity() {
        let mut source = ScriptedSource::new(
            &[false, false, true],
            &[false, true],
            &[
                &[Sample::new(1, 2, 3), Sample::new(4, 5, 6)],
                &[Sample::new(7, 8, 9)],
            ],
        );
        let mut window: Vec<Sample, 16> = Vec::new();

        let count = capture_window(&mut source, &CaptureConfig::default(), &mut window).unwrap();

        assert_eq!(count, 3);
        assert_eq!(source.armed, 1);
        assert_eq!(
            window.as_slice(),
            &[
                Sample::new(1, 2, 3),
                Sample::new(4, 5, 6),
                Sample::new(7, 8, 9)
            ]
        );
    }

    #[test]
    fn a_silent_sensor_times_out_after_the_poll_budget() {
        let mut source = ScriptedSource::new(&[], &[], &[]);
        let mut window: Vec<Sample, 4> = Vec::new();
        let config = CaptureConfig { poll_budget: 25 };

        let result = capture_window(&mut source, &config, &mut window);
        assert_eq!(result, Err(PollError::Timeout));
        assert!(window.is_empty());
    }

    #[test]
    fn a_full_window_finalizes_before_inactivity() {
        let samples = [Sample::new(1, 1, 1); 3];
        let mut source = ScriptedSource::new(&[true], &[false, false, false], &[&samples, &samples]);
        let mut window: Vec<Sample, 4> = Vec::new();

        let count = capture_window(&mut source, &CaptureConfig::default(), &mut window).unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn stale_contents_are_discarded_when_a_window_starts() {
        let mut source = ScriptedSource::new(&[true], &[true], &[&[Sample::new(9, 9, 9)]]);
        let mut window: Vec<Sample, 8> = Vec::new();
        window.push(Sample::new(1, 1, 1)).unwrap();

        let count = capture_window(&mut source, &CaptureConfig::default(), &mut window).unwrap();
        assert_eq!(count, 1);
        assert_eq!(window.as_slice(), &[Sample::new(9, 9, 9)]);
    }

    #[test]
    fn hex_output_matches_the_training_file_layout() {
        let samples = [Sample::new(1, -2, 256)];
        let mut out = String::new();
        write_samples(&mut out, &samples, SampleFormat::Hex).unwrap();
        assert_eq!(out, "0001, fffe, 0100\n");

        let mut out = String::new();
        write_samples(&mut out, &samples, SampleFormat::Decimal).unwrap();
        assert_eq!(out, "   1,   -2,  256\n");
    }

    #[test]
    fn source_errors_propagate_out_of_the_loop() {
        struct FailingSource;

        impl MotionSource for FailingSource {
            type Error = &'static str;

            fn arm(&mut self) -> Result<(), Self::Error> {
                Err("bus fault")
            }

            fn activity(&mut self) -> Result<bool, Self::Error> {
                Ok(false)
            }

            fn inactivity(&mut self) -> Result<bool, Self::Error> {
                Ok(false)
            }

            fn drain<const N: usize>(
                &mut self,
                _out: &mut Vec<Sample, N>,
            ) -> Result<usize, Self::Error> {
                Ok(0)
            }
        }

        let mut window: Vec<Sample, 4> = Vec::new();
        let result = capture_window(&mut FailingSource, &CaptureConfig::default(), &mut window);
        assert_eq!(result, Err(PollError::Source("bus fault")));
    }
}
