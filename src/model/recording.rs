//! Recordings: a URI-keyed directory of signals and events over one store.
//!
//! Signals are always listed in ascending URI order, so iteration is the
//! same from run to run regardless of the order signals were added in.

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{Clock, Error, RecordingConfig, RecordingStore, Result};
use crate::model::event::Event;
use crate::model::signal::{Signal, SignalMetadata};
use crate::model::timeline::{RelativeTimeLine, Temporal, TimeInstant};

/// Descriptive attributes of a recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub label: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub format: Option<String>,
    pub comment: Option<String>,
    pub investigation: Option<String>,
    /// Start of the recording, as given by its source.
    pub start_time: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

pub struct Recording {
    uri: String,
    metadata: RecordingMetadata,
    timeline: RelativeTimeLine,
    signals: BTreeMap<String, Signal>,
    events: BTreeMap<String, Event>,
    store: Option<Box<dyn RecordingStore>>,
    config: RecordingConfig,
}

impl std::fmt::Debug for Recording {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recording")
            .field("uri", &self.uri)
            .field("signals", &self.signals.keys().collect::<Vec<_>>())
            .field("events", &self.events.len())
            .field("open", &self.store.is_some())
            .finish()
    }
}

impl Recording {
    /// Create a recording with no backing store.
    pub fn new(uri: impl Into<String>) -> Self {
        Self::with_config(uri, RecordingConfig::default())
    }

    pub fn with_config(uri: impl Into<String>, config: RecordingConfig) -> Self {
        let uri = uri.into();
        Self {
            timeline: RelativeTimeLine::new(format!("{uri}/timeline")),
            uri,
            metadata: RecordingMetadata::default(),
            signals: BTreeMap::new(),
            events: BTreeMap::new(),
            store: None,
            config,
        }
    }

    /// Open a store and bind a signal for each signal it holds.
    pub fn open(store: Box<dyn RecordingStore>) -> Result<Self> {
        Self::open_with_config(store, RecordingConfig::default())
    }

    pub fn open_with_config(store: Box<dyn RecordingStore>, config: RecordingConfig) -> Result<Self> {
        let uri = store.uri()?;
        Self::bind_store(Self::with_config(uri, config), store)
    }

    /// Open a store that must hold the recording at `uri`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument`: the store holds a different recording
    pub fn open_as(uri: &str, store: Box<dyn RecordingStore>) -> Result<Self> {
        let stored = store.uri()?;
        if stored != uri {
            return Err(Error::invalid(format!(
                "store holds recording {stored}, expected {uri}"
            )));
        }
        Self::open(store)
    }

    fn bind_store(mut self, store: Box<dyn RecordingStore>) -> Result<Self> {
        for uri in store.signal_uris()? {
            let stored = store.open_signal(&uri)?;
            let signal = Signal::open(uri, stored.clock, stored.binding)?.with_metadata(
                SignalMetadata {
                    units: stored.units,
                    ..SignalMetadata::default()
                },
            );
            self.add_signal(signal)?;
        }
        info!("opened recording {} with {} signals", self.uri, self.signals.len());
        self.store = Some(store);
        Ok(self)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn metadata(&self) -> &RecordingMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut RecordingMetadata {
        &mut self.metadata
    }

    pub fn timeline(&self) -> &RelativeTimeLine {
        &self.timeline
    }

    pub fn instant(&self, at: f64) -> TimeInstant {
        self.timeline.instant(at)
    }

    pub fn interval(&self, start: f64, duration: f64) -> Temporal {
        self.timeline.interval(start, duration)
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    /// Add a signal, returning its 0-origin insertion index.
    ///
    /// # Errors
    ///
    /// - `Error::DuplicateUri`: a signal with the same URI is present
    /// - `Error::SignalOwnedElsewhere`: the signal belongs to another
    ///   recording
    pub fn add_signal(&mut self, mut signal: Signal) -> Result<usize> {
        debug!("adding signal {}", signal.uri());
        if self.signals.contains_key(signal.uri()) {
            return Err(Error::DuplicateUri(signal.uri().to_string()));
        }
        if let Some(owner) = signal.recording() {
            if owner != self.uri {
                return Err(Error::SignalOwnedElsewhere {
                    signal: signal.uri().to_string(),
                    recording: owner.to_string(),
                });
            }
        }
        signal.set_recording(&self.uri);
        signal.configure(self.config.reader, self.config.writer);
        self.signals.insert(signal.uri().to_string(), signal);
        Ok(self.signals.len() - 1)
    }

    /// Create storage for a new signal and add it.
    ///
    /// # Errors
    ///
    /// - `Error::StoreClosed`: the recording has no open store
    /// - `Error::DuplicateUri`: the URI is already in use
    pub fn new_signal(
        &mut self,
        uri: &str,
        units: Option<&str>,
        clock: Clock,
    ) -> Result<&mut Signal> {
        if self.signals.contains_key(uri) {
            return Err(Error::DuplicateUri(uri.to_string()));
        }
        let store = self.store.as_mut().ok_or(Error::StoreClosed)?;
        let clock = match clock {
            Clock::Explicit { uri: None, times } => Clock::Explicit {
                uri: Some(format!("{uri}/clock")),
                times,
            },
            clock => clock,
        };
        let binding = store.create_signal(uri, units, &clock)?;
        let mut signal = Signal::new(uri, clock).with_metadata(SignalMetadata {
            units: units.map(str::to_string),
            ..SignalMetadata::default()
        });
        signal.bind(binding);
        self.add_signal(signal)?;
        self.signal_mut(uri)
    }

    /// Look a signal up by URI, or by position in URI order when no URI is
    /// given.
    pub fn get_signal(&self, uri: Option<&str>, index: usize) -> Result<&Signal> {
        match uri {
            Some(uri) => self.signal(uri),
            None => self.signal_at(index),
        }
    }

    pub fn signal(&self, uri: &str) -> Result<&Signal> {
        self.signals
            .get(uri)
            .ok_or_else(|| Error::NotFound(uri.to_string()))
    }

    pub fn signal_mut(&mut self, uri: &str) -> Result<&mut Signal> {
        self.signals
            .get_mut(uri)
            .ok_or_else(|| Error::NotFound(uri.to_string()))
    }

    /// Signal at `index` in URI order.
    pub fn signal_at(&self, index: usize) -> Result<&Signal> {
        self.signals
            .values()
            .nth(index)
            .ok_or_else(|| Error::NotFound(format!("signal index {index}")))
    }

    /// Signals in ascending URI order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.values()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn add_event(&mut self, mut event: Event) {
        event.factor = Some(self.uri.clone());
        self.events.insert(event.uri.clone(), event);
    }

    pub fn get_event(&self, uri: &str) -> Result<&Event> {
        self.events
            .get(uri)
            .ok_or_else(|| Error::NotFound(uri.to_string()))
    }

    /// Events in ascending URI order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Close the backing store. Signals stay listed but their data can no
    /// longer be read or appended to.
    pub fn close(&mut self) -> Result<()> {
        for signal in self.signals.values_mut() {
            signal.detach();
        }
        if let Some(mut store) = self.store.take() {
            store.close()?;
            info!("closed recording {}", self.uri);
        }
        Ok(())
    }

    /// Recording, signal and event metadata as JSON.
    pub fn metadata_json(&self) -> Result<String> {
        let snapshot = RecordingSnapshot {
            uri: &self.uri,
            metadata: &self.metadata,
            timeline: self.timeline.uri(),
            signals: self
                .signals
                .values()
                .map(|signal| SignalSnapshot {
                    uri: signal.uri(),
                    rate: signal.rate(),
                    clock: signal.clock().uri(),
                    length: signal.len(),
                    metadata: signal.metadata(),
                })
                .collect(),
            events: self.events.values().collect(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}

#[derive(Serialize)]
struct RecordingSnapshot<'a> {
    uri: &'a str,
    #[serde(flatten)]
    metadata: &'a RecordingMetadata,
    timeline: &'a str,
    signals: Vec<SignalSnapshot<'a>>,
    events: Vec<&'a Event>,
}

#[derive(Serialize)]
struct SignalSnapshot<'a> {
    uri: &'a str,
    rate: Option<f64>,
    clock: Option<&'a str>,
    length: usize,
    #[serde(flatten)]
    metadata: &'a SignalMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryStore;

    #[test]
    fn duplicate_leaves_recording_unchanged() {
        let mut rec = Recording::new("http://ex.org/rec");
        let clock = Clock::uniform(1.0).unwrap();
        assert_eq!(rec.add_signal(Signal::new("http://ex.org/rec/b", clock.clone())).unwrap(), 0);
        assert_eq!(rec.add_signal(Signal::new("http://ex.org/rec/a", clock.clone())).unwrap(), 1);

        let result = rec.add_signal(Signal::new("http://ex.org/rec/a", clock));
        assert!(matches!(result, Err(Error::DuplicateUri(_))));
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn signal_owned_elsewhere() {
        let mut rec = Recording::new("http://ex.org/rec");
        let signal = Signal::new("http://ex.org/other/s", Clock::uniform(1.0).unwrap())
            .with_recording("http://ex.org/other");
        assert!(matches!(
            rec.add_signal(signal),
            Err(Error::SignalOwnedElsewhere { .. })
        ));
        assert!(rec.is_empty());

        let own = Signal::new("http://ex.org/rec/s", Clock::uniform(1.0).unwrap())
            .with_recording("http://ex.org/rec");
        assert_eq!(rec.add_signal(own).unwrap(), 0);
        assert_eq!(rec.signal("http://ex.org/rec/s").unwrap().recording(), Some("http://ex.org/rec"));
    }

    #[test]
    fn lookup_by_sorted_index() {
        let mut rec = Recording::new("r");
        for uri in ["r/c", "r/a", "r/b"] {
            rec.add_signal(Signal::new(uri, Clock::uniform(1.0).unwrap())).unwrap();
        }
        let uris: Vec<_> = rec.signals().map(|s| s.uri()).collect();
        assert_eq!(uris, vec!["r/a", "r/b", "r/c"]);
        assert_eq!(rec.get_signal(None, 1).unwrap().uri(), "r/b");
        assert_eq!(rec.get_signal(Some("r/c"), 0).unwrap().uri(), "r/c");
        assert!(matches!(rec.get_signal(None, 3), Err(Error::NotFound(_))));
        assert!(matches!(rec.get_signal(Some("r/z"), 0), Err(Error::NotFound(_))));
    }

    #[test]
    fn new_signal_without_store() {
        let mut rec = Recording::new("r");
        assert!(matches!(
            rec.new_signal("r/s", None, Clock::uniform(1.0).unwrap()),
            Err(Error::StoreClosed)
        ));
    }

    #[test]
    fn anonymous_clock_named_after_signal() {
        let mut rec = Recording::open(Box::new(MemoryStore::new("r"))).unwrap();
        let clock = Clock::explicit(Vec::new()).unwrap();
        let signal = rec.new_signal("r/s", None, clock).unwrap();
        assert_eq!(signal.clock().uri(), Some("r/s/clock"));

        let json: serde_json::Value = serde_json::from_str(&rec.metadata_json().unwrap()).unwrap();
        assert_eq!(json["signals"][0]["clock"], "r/s/clock");
    }

    #[test]
    fn events_take_recording_as_factor() {
        let mut rec = Recording::new("r");
        let time = rec.interval(1.0, 2.0);
        rec.add_event(Event::new("r/event/1").with_description("artifact").with_time(time));
        let event = rec.get_event("r/event/1").unwrap();
        assert_eq!(event.factor.as_deref(), Some("r"));
        assert_eq!(event.time.as_ref().unwrap().end(), 3.0);
        assert_eq!(rec.events().count(), 1);
    }

    #[test]
    fn timeline_under_recording_uri() {
        let rec = Recording::new("http://ex.org/rec");
        assert_eq!(rec.timeline().uri(), "http://ex.org/rec/timeline");
        assert!(rec.instant(0.5).uri.starts_with("http://ex.org/rec/timeline/"));
    }
}
