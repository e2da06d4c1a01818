//! Biosignal recordings with segmented data access.
//!
//! A [`Recording`] is a directory of [`Signal`]s backed by a
//! [`RecordingStore`]. Signals are clocked either uniformly (a fixed sample
//! rate) or explicitly (one timestamp per sample); both are read as a lazy
//! sequence of bounded [`DataSegment`]s and appended to as [`TimeSeries`].
//!
//! ```
//! use biosignal::{Clock, MemoryStore, ReadRequest, Recording, TimeSeries};
//!
//! let store = MemoryStore::new("http://example.org/rec");
//! let mut recording = Recording::open(Box::new(store))?;
//! let signal = recording.new_signal(
//!     "http://example.org/rec/signal/0",
//!     Some("uV"),
//!     Clock::uniform(100.0)?,
//! )?;
//! signal.append(&TimeSeries::uniform(vec![0.5; 1000], 100.0)?)?;
//!
//! let lens = signal
//!     .read(&ReadRequest::new().max_points(300))?
//!     .map(|segment| segment.map(|s| s.len()))
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(lens, vec![300, 300, 300, 100]);
//! # Ok::<(), biosignal::Error>(())
//! ```

pub mod core;
pub mod model;

pub use crate::core::{
    Addressing, Clock, DataSegment, Error, MemoryStore, ReadRequest, ReaderConfig,
    RecordingConfig, RecordingStore, Result, SampleTimes, SegmentReader, SignalStore,
    TimeSeries, WriterConfig,
};
pub use crate::model::{
    Event, Recording, RecordingMetadata, RelativeTimeLine, Signal, SignalMetadata, Temporal,
    TimeInstant, TimeInterval,
};
