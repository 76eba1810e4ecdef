//! Offset calibration routines.
//!
//! Two strategies, both driven through [`OffsetTarget`] so any chip with
//! writable offset registers can use them: a one-shot averaging pass and an
//! iterative ±1 bang-bang search toward per-axis rest targets. All state is
//! local to one invocation; results come back in a report struct.

use crate::log::trace;
use crate::poll::{PollError, poll_until};
use crate::sample::Sample;

/// Hooks a chip driver exposes to the calibration routines.
pub trait OffsetTarget {
    /// Error type produced by the underlying driver.
    type Error;

    /// Whether a fresh sample is available.
    fn data_ready(&mut self) -> core::result::Result<bool, Self::Error>;

    /// Reads the current sample.
    fn read_sample(&mut self) -> core::result::Result<Sample, Self::Error>;

    /// Writes the per-axis offset corrections into the device registers.
    /// Values outside the chip's offset range are saturated by the driver.
    fn apply_offsets(&mut self, offsets: [i16; 3]) -> core::result::Result<(), Self::Error>;
}

/// Per-axis rest values the search steps toward, in output LSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestTargets {
    /// Expected X reading at rest.
    pub x: i16,
    /// Expected Y reading at rest.
    pub y: i16,
    /// Expected Z reading at rest.
    pub z: i16,
}

impl RestTargets {
    /// Targets for an arbitrary mounting orientation.
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Targets for a device resting level: 0 on X and Y, `z_rest` on Z.
    /// `z_rest` is the signed 1 g LSB count for the configured range and
    /// orientation (e.g. −256 for an ADXL345 in full resolution lying on
    /// its face).
    pub const fn level(z_rest: i16) -> Self {
        Self::new(0, 0, z_rest)
    }
}

/// Termination tuning for [`offset_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    /// An axis is converged once `|reading - target| <= tolerance`. Zero
    /// reproduces the exact-match rule; widen it when measurement noise
    /// straddles the target.
    pub tolerance: i16,
    /// Upper bound on search iterations across all axes.
    pub max_iterations: u32,
    /// Give-up budget for each data-ready wait.
    pub poll_budget: u32,
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            tolerance: 0,
            max_iterations: 1024,
            poll_budget: crate::poll::DEFAULT_POLL_BUDGET,
        }
    }
}

/// Result of a calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOutcome {
    /// Final offsets left in the device registers, X/Y/Z order.
    pub offsets: [i16; 3],
    /// Number of sample iterations consumed.
    pub iterations: u32,
    /// Which axes reached their target within tolerance.
    pub converged: [bool; 3],
}

impl CalibrationOutcome {
    /// Whether every axis converged.
    pub fn is_converged(&self) -> bool {
        self.converged.iter().all(|axis| *axis)
    }
}

/// Iteratively nudges each axis offset by ±1 toward its rest target.
///
/// Each axis stops independently once its reading is within tolerance; the
/// whole search stops at `max_iterations` so a noisy axis reports
/// non-convergence instead of oscillating forever.
pub fn offset_search<T>(
    target: &mut T,
    rest: RestTargets,
    convergence: Convergence,
) -> core::result::Result<CalibrationOutcome, PollError<T::Error>>
where
    T: OffsetTarget,
{
    let goals = [rest.x, rest.y, rest.z];
    let mut offsets = [0i16; 3];
    let mut converged = [false; 3];
    let mut iterations = 0;

    target.apply_offsets(offsets)?;

    while iterations < convergence.max_iterations {
        poll_until(convergence.poll_budget, || target.data_ready())?;
        let reading = target.read_sample()?.to_array();
        iterations += 1;

        for axis in 0..3 {
            if converged[axis] {
                continue;
            }

            let delta = i32::from(reading[axis]) - i32::from(goals[axis]);
            if delta.unsigned_abs() <= convergence.tolerance.unsigned_abs() as u32 {
                converged[axis] = true;
            } else if delta > 0 {
                offsets[axis] -= 1;
            } else {
                offsets[axis] += 1;
            }
        }

        trace!(
            "offset search: iteration {=u32} offsets [{=i16}, {=i16}, {=i16}]",
            iterations,
            offsets[0],
            offsets[1],
            offsets[2]
        );

        if converged.iter().all(|axis| *axis) {
            break;
        }

        target.apply_offsets(offsets)?;
    }

    Ok(CalibrationOutcome {
        offsets,
        iterations,
        converged,
    })
}

/// Averages `samples` readings per axis and writes back the negated mean,
/// scaled by `offset_lsb_ratio` (how many output LSB one offset-register
/// LSB is worth; 4 for the ADXL345 in full resolution).
///
/// Offset registers are cleared before sampling so the mean measures the
/// uncorrected bias. The device must be at rest for the duration.
pub fn calibrate_by_averaging<T>(
    target: &mut T,
    samples: u32,
    offset_lsb_ratio: i32,
    poll_budget: u32,
) -> core::result::Result<[i16; 3], PollError<T::Error>>
where
    T: OffsetTarget,
{
    let samples = samples.max(1);
    target.apply_offsets([0; 3])?;

    let mut sums = [0i32; 3];
    for _ in 0..samples {
        poll_until(poll_budget, || target.data_ready())?;
        let reading = target.read_sample()?.to_array();
        for axis in 0..3 {
            sums[axis] += i32::from(reading[axis]);
        }
    }

    let divisor = offset_lsb_ratio * samples as i32;
    let mut offsets = [0i16; 3];
    for axis in 0..3 {
        offsets[axis] = -div_round(sums[axis], divisor) as i16;
    }

    target.apply_offsets(offsets)?;
    Ok(offsets)
}

// Round-half-away-from-zero; plain integer division truncates toward zero
// and would bias the correction low.
const fn div_round(numerator: i32, divisor: i32) -> i32 {
    if numerator >= 0 {
        (numerator + divisor / 2) / divisor
    } else {
        (numerator - divisor / 2) / divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::vec::Vec;

    /// Deterministic rest model: each reading is the static bias plus the
    /// currently applied offsets.
    struct RestingSensor {
        bias: [i16; 3],
        offsets: [i16; 3],
        applied: Vec<[i16; 3]>,
        respond: bool,
    }

    impl RestingSensor {
        fn new(bias: [i16; 3]) -> Self {
            Self {
                bias,
                offsets: [0; 3],
                applied: Vec::new(),
                respond: true,
            }
        }
    }

    impl OffsetTarget for RestingSensor {
        type Error = Infallible;

        fn data_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(self.respond)
        }

        fn read_sample(&mut self) -> Result<Sample, Self::Error> {
            Ok(Sample::new(
                self.bias[0] + self.offsets[0],
                self.bias[1] + self.offsets[1],
                self.bias[2] + self.offsets[2],
            ))
        }

        fn apply_offsets(&mut self, offsets: [i16; 3]) -> Result<(), Self::Error> {
            self.offsets = offsets;
            self.applied.push(offsets);
            Ok(())
        }
    }

    #[test]
    fn search_converges_within_the_initial_deviation() {
        let mut sensor = RestingSensor::new([3, -2, -251]);
        let outcome = offset_search(
            &mut sensor,
            RestTargets::level(-256),
            Convergence::default(),
        )
        .unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.offsets, [-3, 2, -5]);
        // Largest deviation is 5 LSB; one extra iteration confirms the hit.
        assert!(outcome.iterations <= 6);
        assert_eq!(sensor.offsets, [-3, 2, -5]);
    }

    #[test]
    fn an_axis_that_never_settles_reports_non_convergence() {
        struct StuckSensor;

        impl OffsetTarget for StuckSensor {
            type Error = Infallible;

            fn data_ready(&mut self) -> Result<bool, Self::Error> {
                Ok(true)
            }

            fn read_sample(&mut self) -> Result<Sample, Self::Error> {
                // X never reaches the target no matter the offset.
                Ok(Sample::new(100, 0, -256))
            }

            fn apply_offsets(&mut self, _offsets: [i16; 3]) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let convergence = Convergence {
            max_iterations: 32,
            ..Convergence::default()
        };
        let outcome =
            offset_search(&mut StuckSensor, RestTargets::level(-256), convergence).unwrap();

        assert_eq!(outcome.iterations, 32);
        assert_eq!(outcome.converged, [false, true, true]);
        assert!(!outcome.is_converged());
    }

    #[test]
    fn tolerance_accepts_nearby_readings_without_stepping() {
        let mut sensor = RestingSensor::new([2, -1, -255]);
        let convergence = Convergence {
            tolerance: 2,
            ..Convergence::default()
        };
        let outcome =
            offset_search(&mut sensor, RestTargets::level(-256), convergence).unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.offsets, [0, 0, 0]);
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn search_times_out_when_data_ready_never_asserts() {
        let mut sensor = RestingSensor::new([0, 0, -256]);
        sensor.respond = false;

        let result = offset_search(
            &mut sensor,
            RestTargets::level(-256),
            Convergence::default(),
        );
        assert_eq!(result, Err(PollError::Timeout));
    }

    #[test]
    fn averaging_negates_the_scaled_rounded_mean() {
        let mut sensor = RestingSensor::new([10, -6, 260]);
        let offsets = calibrate_by_averaging(&mut sensor, 4, 4, 1000).unwrap();

        assert_eq!(offsets, [-3, 2, -65]);
        // Cleared before sampling, then programmed with the result.
        assert_eq!(sensor.applied.first(), Some(&[0, 0, 0]));
        assert_eq!(sensor.applied.last(), Some(&[-3, 2, -65]));
    }
}
