//! Store bindings.
//!
//! The segmented reader and writer never touch storage directly. They go
//! through a [`SignalStore`] handle, which can slice stored samples by index
//! and extend them (plus the stored timestamp sequence for explicitly
//! clocked signals). A [`RecordingStore`] owns those handles for a whole
//! recording: it lists, opens and creates signals and invalidates every
//! handle when closed.
//!
//! [`MemoryStore`] is the in-process implementation. Clock datasets are kept
//! apart from signal datasets and referenced by clock URI, the way a
//! hierarchical container lays them out.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::core::{Clock, Error, Result};

/// Handle to the stored samples of one signal.
pub trait SignalStore {
    /// Number of stored samples.
    fn len(&self) -> Result<usize>;

    /// Up to `count` samples starting at `start`.
    ///
    /// Returns fewer than `count` near the end of the data and an empty
    /// vector at or past the end.
    fn slice(&self, start: usize, count: usize) -> Result<Vec<f64>>;

    /// Append sample values.
    fn extend_values(&mut self, values: &[f64]) -> Result<()>;

    /// Append timestamps to the signal's stored clock.
    fn extend_clock(&mut self, times: &[f64]) -> Result<()>;
}

/// A signal found in a store, ready to be bound.
pub struct StoredSignal {
    pub binding: Box<dyn SignalStore>,
    pub clock: Clock,
    pub units: Option<String>,
}

/// Container holding every signal of a recording.
pub trait RecordingStore {
    /// URI of the recording the store holds.
    fn uri(&self) -> Result<String>;

    /// URIs of the stored signals, sorted.
    fn signal_uris(&self) -> Result<Vec<String>>;

    /// Open an existing signal.
    fn open_signal(&self, uri: &str) -> Result<StoredSignal>;

    /// Create empty storage for a new signal.
    ///
    /// Explicit clocks are stored as a separate dataset keyed by clock URI.
    fn create_signal(
        &mut self,
        uri: &str,
        units: Option<&str>,
        clock: &Clock,
    ) -> Result<Box<dyn SignalStore>>;

    /// Close the store. Every handle it gave out fails with
    /// `Error::StoreClosed` afterwards.
    fn close(&mut self) -> Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug)]
struct StoredData {
    values: Vec<f64>,
    units: Option<String>,
    rate: Option<f64>,
    clock: Option<String>,
}

#[derive(Debug)]
struct MemoryState {
    uri: String,
    closed: bool,
    signals: BTreeMap<String, StoredData>,
    clocks: BTreeMap<String, Vec<f64>>,
}

impl MemoryState {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::StoreClosed)
        } else {
            Ok(())
        }
    }

    fn signal(&self, uri: &str) -> Result<&StoredData> {
        self.signals
            .get(uri)
            .ok_or_else(|| Error::NotFound(uri.to_string()))
    }

    fn signal_mut(&mut self, uri: &str) -> Result<&mut StoredData> {
        self.signals
            .get_mut(uri)
            .ok_or_else(|| Error::NotFound(uri.to_string()))
    }
}

/// In-memory recording store.
///
/// Cloning gives another handle onto the same data, so a store can be kept
/// by the caller after handing it to a recording.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryState {
                uri: uri.into(),
                closed: false,
                signals: BTreeMap::new(),
                clocks: BTreeMap::new(),
            })),
        }
    }

    /// Store a uniformly sampled signal.
    pub fn insert_uniform(
        &self,
        uri: impl Into<String>,
        units: Option<&str>,
        rate: f64,
        values: Vec<f64>,
    ) -> Result<()> {
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        let uri = uri.into();
        if state.signals.contains_key(&uri) {
            return Err(Error::DuplicateUri(uri));
        }
        Clock::uniform(rate)?;
        state.signals.insert(
            uri,
            StoredData {
                values,
                units: units.map(str::to_string),
                rate: Some(rate),
                clock: None,
            },
        );
        Ok(())
    }

    /// Store an explicitly clocked signal together with its clock dataset.
    pub fn insert_explicit(
        &self,
        uri: impl Into<String>,
        units: Option<&str>,
        clock_uri: impl Into<String>,
        times: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<()> {
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        let uri = uri.into();
        let clock_uri = clock_uri.into();
        if state.signals.contains_key(&uri) {
            return Err(Error::DuplicateUri(uri));
        }
        if state.clocks.contains_key(&clock_uri) {
            return Err(Error::DuplicateUri(clock_uri));
        }
        if times.len() != values.len() {
            return Err(Error::DimensionMismatch(
                "clock and signal datasets differ in length",
            ));
        }
        Clock::explicit(times.clone())?;
        state.clocks.insert(clock_uri.clone(), times);
        state.signals.insert(
            uri,
            StoredData {
                values,
                units: units.map(str::to_string),
                rate: None,
                clock: Some(clock_uri),
            },
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }

    fn binding(&self, uri: &str, clock: Option<String>) -> Box<dyn SignalStore> {
        Box::new(MemoryBinding {
            inner: Rc::clone(&self.inner),
            uri: uri.to_string(),
            clock,
        })
    }
}

impl RecordingStore for MemoryStore {
    fn uri(&self) -> Result<String> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        Ok(state.uri.clone())
    }

    fn signal_uris(&self) -> Result<Vec<String>> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        Ok(state.signals.keys().cloned().collect())
    }

    fn open_signal(&self, uri: &str) -> Result<StoredSignal> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        let data = state.signal(uri)?;
        let clock = match (&data.clock, data.rate) {
            (Some(clock_uri), _) => {
                let times = state
                    .clocks
                    .get(clock_uri)
                    .ok_or_else(|| Error::NotFound(clock_uri.clone()))?;
                Clock::explicit_with_uri(clock_uri.clone(), times.clone())?
            }
            (None, Some(rate)) => Clock::uniform(rate)?,
            (None, None) => {
                return Err(Error::invalid(format!("signal {uri} has neither rate nor clock")))
            }
        };
        Ok(StoredSignal {
            binding: self.binding(uri, data.clock.clone()),
            clock,
            units: data.units.clone(),
        })
    }

    fn create_signal(
        &mut self,
        uri: &str,
        units: Option<&str>,
        clock: &Clock,
    ) -> Result<Box<dyn SignalStore>> {
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        if state.signals.contains_key(uri) {
            return Err(Error::DuplicateUri(uri.to_string()));
        }
        let (rate, clock_uri) = match clock {
            Clock::Uniform { rate } => (Some(*rate), None),
            Clock::Explicit { uri: clock_uri, times } => {
                let clock_uri = clock_uri
                    .clone()
                    .unwrap_or_else(|| format!("{uri}/clock"));
                if state.clocks.contains_key(&clock_uri) {
                    return Err(Error::DuplicateUri(clock_uri));
                }
                if !times.is_empty() {
                    return Err(Error::invalid(
                        "a new signal's explicit clock must start empty",
                    ));
                }
                state.clocks.insert(clock_uri.clone(), Vec::new());
                (None, Some(clock_uri))
            }
        };
        state.signals.insert(
            uri.to_string(),
            StoredData {
                values: Vec::new(),
                units: units.map(str::to_string),
                rate,
                clock: clock_uri.clone(),
            },
        );
        drop(state);
        Ok(self.binding(uri, clock_uri))
    }

    fn close(&mut self) -> Result<()> {
        self.inner.borrow_mut().closed = true;
        Ok(())
    }
}

/// Per-signal handle into a [`MemoryStore`].
struct MemoryBinding {
    inner: Rc<RefCell<MemoryState>>,
    uri: String,
    clock: Option<String>,
}

impl SignalStore for MemoryBinding {
    fn len(&self) -> Result<usize> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        Ok(state.signal(&self.uri)?.values.len())
    }

    fn slice(&self, start: usize, count: usize) -> Result<Vec<f64>> {
        let state = self.inner.borrow();
        state.ensure_open()?;
        let values = &state.signal(&self.uri)?.values;
        let start = start.min(values.len());
        let end = start.saturating_add(count).min(values.len());
        Ok(values[start..end].to_vec())
    }

    fn extend_values(&mut self, values: &[f64]) -> Result<()> {
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        state.signal_mut(&self.uri)?.values.extend_from_slice(values);
        Ok(())
    }

    fn extend_clock(&mut self, times: &[f64]) -> Result<()> {
        let clock_uri = self
            .clock
            .as_ref()
            .ok_or(Error::DimensionMismatch("signal has no stored clock"))?;
        let mut state = self.inner.borrow_mut();
        state.ensure_open()?;
        state
            .clocks
            .get_mut(clock_uri)
            .ok_or_else(|| Error::NotFound(clock_uri.clone()))?
            .extend_from_slice(times);
        Ok(())
    }
}
