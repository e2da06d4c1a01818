//! Segmented appends.
//!
//! A [`TimeSeries`] is forwarded to the store in blocks of at most
//! `WriterConfig::max_block_points` samples. For explicitly clocked signals
//! each block's timestamps reach the store before its values, so a reader
//! never sees a value without a time.

use log::debug;

use crate::core::config::WriterConfig;
use crate::core::series::SampleTimes;
use crate::core::store::SignalStore;
use crate::core::{Clock, Error, Result, TimeSeries};

/// Appends series to one signal's storage, keeping its clock and cached
/// length in step.
pub struct SegmentWriter<'a> {
    store: &'a mut dyn SignalStore,
    clock: &'a mut Clock,
    len: &'a mut usize,
    config: WriterConfig,
}

impl<'a> SegmentWriter<'a> {
    pub fn new(
        store: &'a mut dyn SignalStore,
        clock: &'a mut Clock,
        len: &'a mut usize,
        config: WriterConfig,
    ) -> Self {
        Self {
            store,
            clock,
            len,
            config,
        }
    }

    /// Append `series` to the signal.
    ///
    /// The whole series is validated before anything is written. If the
    /// store fails part way, the blocks already written stay written and
    /// are counted in the signal length.
    ///
    /// # Errors
    ///
    /// - `Error::DimensionMismatch`: series and signal clocks differ in kind,
    ///   or an earlier append left the clock longer than the signal
    /// - `Error::InvalidArgument`: uniform rates differ, or the timestamps
    ///   would make the signal's clock non-monotonic
    /// - `Error::StoreClosed`: the store has been closed
    pub fn append(&mut self, series: &TimeSeries) -> Result<()> {
        match (&*self.clock, series.sample_times()) {
            (Clock::Uniform { rate }, SampleTimes::Rate(series_rate)) => {
                if rate != series_rate {
                    return Err(Error::invalid(format!(
                        "series rate {series_rate} differs from signal rate {rate}"
                    )));
                }
            }
            (Clock::Explicit { times: clock_times, .. }, SampleTimes::Times(times)) => {
                if clock_times.len() != *self.len {
                    return Err(Error::DimensionMismatch(
                        "explicit clock and stored signal differ in length",
                    ));
                }
                self.clock.check_extend(times)?;
            }
            (Clock::Uniform { .. }, SampleTimes::Times(_)) => {
                return Err(Error::DimensionMismatch(
                    "explicitly timed series appended to a uniform signal",
                ))
            }
            (Clock::Explicit { .. }, SampleTimes::Rate(_)) => {
                return Err(Error::DimensionMismatch(
                    "uniform series appended to an explicitly clocked signal",
                ))
            }
        }

        for block in series.split(self.config.max_block_points) {
            if let Some(times) = block.timestamps() {
                self.store.extend_clock(times)?;
                self.clock.extend(times)?;
            }
            self.store.extend_values(block.values())?;
            *self.len += block.len();
        }
        debug!("appended {} samples, length now {}", series.len(), *self.len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{MemoryStore, RecordingStore};

    #[test]
    fn uniform_append_in_blocks() {
        let mut store = MemoryStore::new("rec");
        let mut clock = Clock::uniform(10.0).unwrap();
        let mut binding = store.create_signal("rec/s", None, &clock).unwrap();
        let mut len = 0;

        let series = TimeSeries::uniform((0..25).map(f64::from).collect(), 10.0).unwrap();
        let config = WriterConfig {
            max_block_points: 10,
        };
        SegmentWriter::new(binding.as_mut(), &mut clock, &mut len, config)
            .append(&series)
            .unwrap();

        assert_eq!(len, 25);
        assert_eq!(binding.len().unwrap(), 25);
        assert_eq!(binding.slice(20, 10).unwrap(), vec![20.0, 21.0, 22.0, 23.0, 24.0]);
    }

    #[test]
    fn explicit_append_extends_clock_first() {
        let mut store = MemoryStore::new("rec");
        let mut clock = Clock::explicit_with_uri("rec/c", Vec::new()).unwrap();
        let mut binding = store.create_signal("rec/s", None, &clock).unwrap();
        let mut len = 0;

        let series = TimeSeries::explicit(vec![0.0, 0.5, 0.7], vec![1.0, 2.0, 3.0]).unwrap();
        SegmentWriter::new(binding.as_mut(), &mut clock, &mut len, WriterConfig::default())
            .append(&series)
            .unwrap();

        assert_eq!(clock.len(), Some(3));
        let stored = store.open_signal("rec/s").unwrap();
        assert_eq!(stored.clock.slice(0, 3).unwrap(), &[0.0, 0.5, 0.7]);
    }

    #[test]
    fn non_monotonic_append_writes_nothing() {
        let mut store = MemoryStore::new("rec");
        let mut clock = Clock::explicit_with_uri("rec/c", Vec::new()).unwrap();
        let mut binding = store.create_signal("rec/s", None, &clock).unwrap();
        let mut len = 0;
        let mut writer =
            SegmentWriter::new(binding.as_mut(), &mut clock, &mut len, WriterConfig::default());

        let first = TimeSeries::explicit(vec![0.0, 0.4], vec![1.0, 2.0]).unwrap();
        writer.append(&first).unwrap();
        let bad = TimeSeries::explicit(vec![0.35], vec![9.0]).unwrap();
        assert!(matches!(writer.append(&bad), Err(Error::InvalidArgument(_))));

        assert_eq!(len, 2);
        assert_eq!(binding.len().unwrap(), 2);
    }

    #[test]
    fn clock_kind_mismatch() {
        let mut store = MemoryStore::new("rec");
        let mut clock = Clock::uniform(1.0).unwrap();
        let mut binding = store.create_signal("rec/s", None, &clock).unwrap();
        let mut len = 0;
        let series = TimeSeries::explicit(vec![0.0], vec![1.0]).unwrap();
        let result =
            SegmentWriter::new(binding.as_mut(), &mut clock, &mut len, WriterConfig::default())
                .append(&series);
        assert!(matches!(result, Err(Error::DimensionMismatch(_))));
    }

    /// Accepts timestamps but closes before values land.
    #[derive(Default)]
    struct ValuesFail {
        times: Vec<f64>,
    }

    impl SignalStore for ValuesFail {
        fn len(&self) -> Result<usize> {
            Ok(0)
        }

        fn slice(&self, _start: usize, _count: usize) -> Result<Vec<f64>> {
            Ok(Vec::new())
        }

        fn extend_values(&mut self, _values: &[f64]) -> Result<()> {
            Err(Error::StoreClosed)
        }

        fn extend_clock(&mut self, times: &[f64]) -> Result<()> {
            self.times.extend_from_slice(times);
            Ok(())
        }
    }

    #[test]
    fn append_refused_after_interrupted_write() {
        let mut store = ValuesFail::default();
        let mut clock = Clock::explicit_with_uri("rec/c", Vec::new()).unwrap();
        let mut len = 0;
        let mut writer = SegmentWriter::new(&mut store, &mut clock, &mut len, WriterConfig::default());

        let first = TimeSeries::explicit(vec![0.0], vec![5.0]).unwrap();
        assert!(matches!(writer.append(&first), Err(Error::StoreClosed)));
        let second = TimeSeries::explicit(vec![2.0], vec![7.0]).unwrap();
        assert!(matches!(writer.append(&second), Err(Error::DimensionMismatch(_))));

        assert_eq!(len, 0);
        assert_eq!(clock.len(), Some(1));
        assert_eq!(store.times, vec![0.0]);
    }
}
