//! Events: annotated instants or intervals on a recording's timeline.

use serde::Serialize;

use crate::model::timeline::Temporal;

/// Something that happened during a recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub uri: String,
    pub description: Option<String>,
    pub time: Option<Temporal>,
    /// URI of the recording the event belongs to.
    pub factor: Option<String>,
}

impl Event {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            description: None,
            time: None,
            factor: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_time(mut self, time: Temporal) -> Self {
        self.time = Some(time);
        self
    }
}
