//! Storage-facing primitives: clocks, time series, store bindings and the
//! segmented reader/writer that move samples between them.

pub mod clock;
pub mod config;
pub mod error;
pub mod reader;
pub mod series;
pub mod store;
pub mod writer;

pub use clock::Clock;
pub use config::{ReaderConfig, RecordingConfig, WriterConfig, DEFAULT_MAX_POINTS};
pub use error::{Error, Result};
pub use reader::{Addressing, ReadRequest, SegmentReader};
pub use series::{DataSegment, SampleTimes, TimeSeries};
pub use store::{MemoryStore, RecordingStore, SignalStore, StoredSignal};
pub use writer::SegmentWriter;
