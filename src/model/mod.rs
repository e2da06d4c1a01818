//! Recording model: recordings, their signals, events and timeline.

pub mod event;
pub mod recording;
pub mod signal;
pub mod timeline;
pub mod uri;

pub use event::Event;
pub use recording::{Recording, RecordingMetadata};
pub use signal::{Signal, SignalMetadata};
pub use timeline::{RelativeTimeLine, Temporal, TimeInstant, TimeInterval};
pub use uri::make_uri;
