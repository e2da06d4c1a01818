//! Time-series values and the segments yielded by reads.

use crate::core::clock::validate_rate;
use crate::core::{Error, Result};

/// How the samples of a [`TimeSeries`] are placed in time.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleTimes {
    /// Samples are spaced `1 / rate` seconds apart.
    Rate(f64),
    /// One timestamp per sample.
    Times(Vec<f64>),
}

/// An immutable run of sample values with their timing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<f64>,
    times: SampleTimes,
}

impl TimeSeries {
    /// Create a uniformly sampled series.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument`: rate is not a positive finite number
    pub fn uniform(values: Vec<f64>, rate: f64) -> Result<Self> {
        validate_rate(rate)?;
        Ok(Self {
            values,
            times: SampleTimes::Rate(rate),
        })
    }

    /// Create a series with one timestamp per value.
    ///
    /// # Errors
    ///
    /// - `Error::DimensionMismatch`: `times` and `values` differ in length
    pub fn explicit(times: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if times.len() != values.len() {
            return Err(Error::DimensionMismatch(
                "timestamps and values differ in length",
            ));
        }
        Ok(Self {
            values,
            times: SampleTimes::Times(times),
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sample_times(&self) -> &SampleTimes {
        &self.times
    }

    pub fn timestamps(&self) -> Option<&[f64]> {
        match &self.times {
            SampleTimes::Rate(_) => None,
            SampleTimes::Times(times) => Some(times),
        }
    }

    pub fn rate(&self) -> Option<f64> {
        match self.times {
            SampleTimes::Rate(rate) => Some(rate),
            SampleTimes::Times(_) => None,
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self.times, SampleTimes::Rate(_))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Time of sample `index`, relative to the start of the series for
    /// uniform series.
    pub fn time_at(&self, index: usize) -> Result<f64> {
        if index >= self.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(match &self.times {
            SampleTimes::Rate(rate) => index as f64 / rate,
            SampleTimes::Times(times) => times[index],
        })
    }

    /// Time spanned by the series.
    pub fn duration(&self) -> f64 {
        match &self.times {
            SampleTimes::Rate(rate) => self.len() as f64 / rate,
            SampleTimes::Times(times) => match (times.first(), times.last()) {
                (Some(first), Some(last)) => last - first,
                _ => 0.0,
            },
        }
    }

    /// Split into consecutive sub-series of at most `max_points` samples.
    ///
    /// A `max_points` of zero yields the whole series as one block.
    pub fn split(&self, max_points: usize) -> impl Iterator<Item = TimeSeries> + '_ {
        let block = if max_points == 0 {
            self.len().max(1)
        } else {
            max_points
        };
        (0..self.len()).step_by(block).map(move |start| {
            let end = (start + block).min(self.len());
            self.range(start, end)
        })
    }

    fn range(&self, start: usize, end: usize) -> TimeSeries {
        let times = match &self.times {
            SampleTimes::Rate(rate) => SampleTimes::Rate(*rate),
            SampleTimes::Times(times) => SampleTimes::Times(times[start..end].to_vec()),
        };
        TimeSeries {
            values: self.values[start..end].to_vec(),
            times,
        }
    }

    pub fn into_parts(self) -> (Vec<f64>, SampleTimes) {
        (self.values, self.times)
    }
}

/// A bounded chunk of signal data tagged with its origin.
///
/// For uniformly clocked signals `start` is the time of the first sample.
/// For explicitly clocked signals it is always `0.0` and the sample times
/// are carried by the series itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSegment {
    start: f64,
    series: TimeSeries,
}

impl DataSegment {
    pub fn new(start: f64, series: TimeSeries) -> Self {
        Self { start, series }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn into_series(self) -> TimeSeries {
        self.series
    }
}
