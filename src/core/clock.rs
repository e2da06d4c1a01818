//! Sample index <-> time mapping.
//!
//! A signal is clocked in one of two ways:
//! - **Uniform**: a fixed sample rate, index and time convert in closed form
//! - **Explicit**: one timestamp per sample, used when sampling is irregular
//!
//! Explicit clocks only ever grow at the end; timestamps are never reordered
//! or truncated once attached to a signal.

use crate::core::{Error, Result};

/// Maps between sample indices and times (in seconds).
#[derive(Debug, Clone, PartialEq)]
pub enum Clock {
    /// Fixed-rate clock: `time = index / rate`.
    Uniform { rate: f64 },
    /// Per-sample timestamps, monotonically non-decreasing.
    Explicit {
        uri: Option<String>,
        times: Vec<f64>,
    },
}

impl Clock {
    /// Create a uniform clock.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument`: rate is not a positive finite number
    pub fn uniform(rate: f64) -> Result<Self> {
        validate_rate(rate)?;
        Ok(Clock::Uniform { rate })
    }

    /// Create an anonymous explicit clock from a timestamp sequence.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument`: timestamps are not non-decreasing
    pub fn explicit(times: Vec<f64>) -> Result<Self> {
        check_monotonic(None, &times)?;
        Ok(Clock::Explicit { uri: None, times })
    }

    /// Create an explicit clock identified by `uri`.
    pub fn explicit_with_uri(uri: impl Into<String>, times: Vec<f64>) -> Result<Self> {
        check_monotonic(None, &times)?;
        Ok(Clock::Explicit {
            uri: Some(uri.into()),
            times,
        })
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, Clock::Uniform { .. })
    }

    /// Sample rate of a uniform clock.
    pub fn rate(&self) -> Option<f64> {
        match self {
            Clock::Uniform { rate } => Some(*rate),
            Clock::Explicit { .. } => None,
        }
    }

    /// URI of an explicit clock, if it has one.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Clock::Uniform { .. } => None,
            Clock::Explicit { uri, .. } => uri.as_deref(),
        }
    }

    /// Number of timestamps held by an explicit clock.
    ///
    /// Uniform clocks have no intrinsic length; callers use the owning
    /// signal's length instead.
    pub fn len(&self) -> Option<usize> {
        match self {
            Clock::Uniform { .. } => None,
            Clock::Explicit { times, .. } => Some(times.len()),
        }
    }

    /// Index of the sample at `time`.
    ///
    /// Uniform clocks round to the nearest sample. Explicit clocks return the
    /// first index whose timestamp is `>= time`, or the clock length if
    /// every timestamp is earlier. Times before zero map to index 0.
    pub fn index_at(&self, time: f64) -> usize {
        match self {
            Clock::Uniform { rate } => {
                let index = (time * rate).round();
                if index.is_nan() || index <= 0.0 {
                    0
                } else {
                    index as usize
                }
            }
            Clock::Explicit { times, .. } => times.partition_point(|t| *t < time),
        }
    }

    /// Time of the sample at `index`.
    ///
    /// # Errors
    ///
    /// - `Error::IndexOutOfRange`: explicit clock has no timestamp at `index`
    pub fn time_at(&self, index: usize) -> Result<f64> {
        match self {
            Clock::Uniform { rate } => Ok(index as f64 / rate),
            Clock::Explicit { times, .. } => times
                .get(index)
                .copied()
                .ok_or(Error::IndexOutOfRange {
                    index,
                    len: times.len(),
                }),
        }
    }

    /// Timestamps for samples `[start, end)` of an explicit clock.
    ///
    /// # Errors
    ///
    /// - `Error::DimensionMismatch`: clock is uniform
    /// - `Error::IndexOutOfRange`: `end` exceeds the clock length
    pub fn slice(&self, start: usize, end: usize) -> Result<&[f64]> {
        match self {
            Clock::Uniform { .. } => Err(Error::DimensionMismatch(
                "uniform clock has no timestamps to slice",
            )),
            Clock::Explicit { times, .. } => {
                if end > times.len() {
                    return Err(Error::IndexOutOfRange {
                        index: end,
                        len: times.len(),
                    });
                }
                Ok(&times[start.min(end)..end])
            }
        }
    }

    /// Check that `new_times` may be appended without breaking monotonicity.
    ///
    /// # Errors
    ///
    /// - `Error::DimensionMismatch`: clock is uniform
    /// - `Error::InvalidArgument`: `new_times` decreases, or starts before the
    ///   current last timestamp
    pub fn check_extend(&self, new_times: &[f64]) -> Result<()> {
        match self {
            Clock::Uniform { .. } => Err(Error::DimensionMismatch(
                "cannot extend a uniform clock",
            )),
            Clock::Explicit { times, .. } => check_monotonic(times.last().copied(), new_times),
        }
    }

    /// Append timestamps to an explicit clock.
    pub fn extend(&mut self, new_times: &[f64]) -> Result<()> {
        self.check_extend(new_times)?;
        if let Clock::Explicit { times, .. } = self {
            times.extend_from_slice(new_times);
        }
        Ok(())
    }
}

pub(crate) fn validate_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!("sample rate must be positive, got {rate}")))
    }
}

fn check_monotonic(last: Option<f64>, times: &[f64]) -> Result<()> {
    let mut prev = last;
    for (i, &t) in times.iter().enumerate() {
        if t.is_nan() {
            return Err(Error::invalid(format!("timestamp {i} is NaN")));
        }
        if let Some(p) = prev {
            if t < p {
                return Err(Error::invalid(format!(
                    "timestamp {t} at position {i} precedes {p}"
                )));
            }
        }
        prev = Some(t);
    }
    Ok(())
}
