//! Signals: a clock, descriptive attributes and a store binding.

use serde::{Deserialize, Serialize};

use crate::core::store::SignalStore;
use crate::core::{
    Clock, Error, ReadRequest, ReaderConfig, Result, SegmentReader, SegmentWriter, TimeSeries,
    WriterConfig,
};

/// Descriptive attributes of a signal.
///
/// Rate and clock are not listed here; they come from the signal's
/// [`Clock`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalMetadata {
    pub label: Option<String>,
    pub units: Option<String>,
    pub transducer: Option<String>,
    pub filter: Option<String>,
    pub min_frequency: Option<f64>,
    pub max_frequency: Option<f64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

/// One sampled channel of a recording.
///
/// A signal reads and appends through its store binding. Without a binding
/// (a signal not yet stored, or one whose recording has been closed) data
/// access fails with `Error::StoreClosed`.
pub struct Signal {
    uri: String,
    metadata: SignalMetadata,
    clock: Clock,
    store: Option<Box<dyn SignalStore>>,
    len: usize,
    recording: Option<String>,
    reader_config: ReaderConfig,
    writer_config: WriterConfig,
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("uri", &self.uri)
            .field("clock", &self.clock)
            .field("len", &self.len)
            .field("recording", &self.recording)
            .field("bound", &self.store.is_some())
            .finish()
    }
}

impl Signal {
    /// Create an unbound, empty signal.
    pub fn new(uri: impl Into<String>, clock: Clock) -> Self {
        Self {
            uri: uri.into(),
            metadata: SignalMetadata::default(),
            clock,
            store: None,
            len: 0,
            recording: None,
            reader_config: ReaderConfig::default(),
            writer_config: WriterConfig::default(),
        }
    }

    /// Create a signal bound to existing stored data.
    ///
    /// # Errors
    ///
    /// - `Error::DimensionMismatch`: an explicit clock does not hold exactly
    ///   one timestamp per stored sample, as left by an interrupted append
    pub fn open(uri: impl Into<String>, clock: Clock, store: Box<dyn SignalStore>) -> Result<Self> {
        let len = store.len()?;
        if let Some(times) = clock.len() {
            if times != len {
                return Err(Error::DimensionMismatch(
                    "explicit clock and stored signal differ in length",
                ));
            }
        }
        let mut signal = Self::new(uri, clock);
        signal.store = Some(store);
        signal.len = len;
        Ok(signal)
    }

    pub fn with_metadata(mut self, metadata: SignalMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Mark the signal as belonging to the recording at `uri`, as when the
    /// link comes from stored metadata.
    pub fn with_recording(mut self, uri: impl Into<String>) -> Self {
        self.recording = Some(uri.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn metadata(&self) -> &SignalMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut SignalMetadata {
        &mut self.metadata
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn rate(&self) -> Option<f64> {
        self.clock.rate()
    }

    /// URI of the owning recording.
    pub fn recording(&self) -> Option<&str> {
        self.recording.as_deref()
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_bound(&self) -> bool {
        self.store.is_some()
    }

    /// Time of sample `index`.
    ///
    /// # Errors
    ///
    /// - `Error::IndexOutOfRange`: `index` is not a stored sample
    pub fn time_at(&self, index: usize) -> Result<f64> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.clock.time_at(index)
    }

    /// Read the signal as a lazy sequence of segments.
    ///
    /// The sequence borrows the signal, so no append can run while it is
    /// alive. Its range is fixed from the signal length when the read is
    /// opened.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument`: conflicting or malformed addressing
    /// - `Error::StoreClosed`: the signal has no live store binding
    pub fn read(&self, request: &ReadRequest) -> Result<SegmentReader<'_>> {
        let store = self.store.as_deref().ok_or(Error::StoreClosed)?;
        SegmentReader::open(store, &self.clock, self.len, request, &self.reader_config)
    }

    /// Append samples to the signal.
    ///
    /// # Errors
    ///
    /// - `Error::DimensionMismatch`: series and signal clocks differ in kind,
    ///   or an interrupted append left the clock out of step with the values
    /// - `Error::InvalidArgument`: the timestamps would break clock
    ///   monotonicity, or the uniform rates differ
    /// - `Error::StoreClosed`: the signal has no live store binding
    pub fn append(&mut self, series: &TimeSeries) -> Result<()> {
        let store = self.store.as_deref_mut().ok_or(Error::StoreClosed)?;
        SegmentWriter::new(store, &mut self.clock, &mut self.len, self.writer_config)
            .append(series)
    }

    pub(crate) fn bind(&mut self, store: Box<dyn SignalStore>) {
        self.store = Some(store);
    }

    pub(crate) fn set_recording(&mut self, uri: &str) {
        self.recording = Some(uri.to_string());
    }

    pub(crate) fn configure(&mut self, reader: ReaderConfig, writer: WriterConfig) {
        self.reader_config = reader;
        self.writer_config = writer;
    }

    /// Drop the store binding; later reads and appends fail with
    /// `Error::StoreClosed`.
    pub(crate) fn detach(&mut self) {
        self.store = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MemoryStore, RecordingStore};

    fn stored_uniform(values: Vec<f64>) -> Signal {
        let store = MemoryStore::new("rec");
        store.insert_uniform("rec/s", None, 100.0, values).unwrap();
        let opened = store.open_signal("rec/s").unwrap();
        Signal::open("rec/s", opened.clock, opened.binding).unwrap()
    }

    #[test]
    fn unbound_signal_refuses_data_access() {
        let mut signal = Signal::new("s", Clock::uniform(1.0).unwrap());
        assert!(matches!(signal.read(&ReadRequest::new()), Err(Error::StoreClosed)));
        let series = TimeSeries::uniform(vec![1.0], 1.0).unwrap();
        assert!(matches!(signal.append(&series), Err(Error::StoreClosed)));
    }

    #[test]
    fn time_at_bounded_by_length() {
        let signal = stored_uniform(vec![0.0; 10]);
        assert_eq!(signal.time_at(5).unwrap(), 0.05);
        assert!(matches!(
            signal.time_at(10),
            Err(Error::IndexOutOfRange { index: 10, len: 10 })
        ));
    }

    #[test]
    fn append_then_read_back() {
        let mut signal = stored_uniform(vec![1.0, 2.0]);
        let series = TimeSeries::uniform(vec![3.0, 4.0, 5.0], 100.0).unwrap();
        signal.append(&series).unwrap();
        assert_eq!(signal.len(), 5);

        let segment = signal
            .read(&ReadRequest::new().range(2, 4))
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(segment.series().values(), &[3.0, 4.0, 5.0]);
        assert_eq!(segment.start(), 0.02);
    }

    #[test]
    fn interleaved_readers_are_independent() {
        let signal = stored_uniform((0..6).map(f64::from).collect());
        let request = ReadRequest::new().max_points(2);
        let mut a = signal.read(&request).unwrap();
        let mut b = signal.read(&request).unwrap();

        let a0 = a.next().unwrap().unwrap();
        let b0 = b.next().unwrap().unwrap();
        let a1 = a.next().unwrap().unwrap();
        assert_eq!(a0, b0);
        assert_eq!(a1.series().values(), &[2.0, 3.0]);
        assert_eq!(b.next().unwrap().unwrap(), a1);
    }

    #[test]
    fn open_rejects_short_clock() {
        let store = MemoryStore::new("rec");
        store.insert_uniform("rec/s", None, 1.0, vec![1.0, 2.0]).unwrap();
        let opened = store.open_signal("rec/s").unwrap();
        let clock = Clock::explicit(vec![0.0]).unwrap();
        assert!(matches!(
            Signal::open("rec/s", clock, opened.binding),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn open_rejects_clock_ahead_of_values() {
        let mut store = MemoryStore::new("rec");
        let clock = Clock::explicit_with_uri("rec/c", Vec::new()).unwrap();
        let mut binding = store.create_signal("rec/s", None, &clock).unwrap();
        // timestamps for two samples, values for one
        binding.extend_clock(&[0.0, 1.0]).unwrap();
        binding.extend_values(&[5.0]).unwrap();

        let opened = store.open_signal("rec/s").unwrap();
        assert_eq!(opened.clock.len(), Some(2));
        assert!(matches!(
            Signal::open("rec/s", opened.clock, opened.binding),
            Err(Error::DimensionMismatch(_))
        ));
    }
}
