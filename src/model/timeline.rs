//! Relative timelines.
//!
//! Every recording has a timeline starting at zero. Instants and intervals
//! on it are named resources: each one gets a freshly minted URI, and
//! shifting one in time mints a sibling URI rather than reusing its own.

use serde::Serialize;

use crate::core::ReadRequest;
use crate::model::uri::make_uri;

/// Timeline whose times are seconds from the start of a recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeTimeLine {
    uri: String,
}

impl RelativeTimeLine {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// A point `at` seconds along the timeline.
    pub fn instant(&self, at: f64) -> TimeInstant {
        TimeInstant {
            uri: make_uri(&self.uri, false),
            at,
            timeline: self.uri.clone(),
        }
    }

    /// A span of `duration` seconds starting at `start`.
    ///
    /// A zero duration gives an instant.
    pub fn interval(&self, start: f64, duration: f64) -> Temporal {
        if duration == 0.0 {
            Temporal::Instant(self.instant(start))
        } else {
            Temporal::Interval(TimeInterval {
                uri: make_uri(&self.uri, false),
                start,
                duration,
                timeline: self.uri.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeInstant {
    pub uri: String,
    pub at: f64,
    pub timeline: String,
}

impl TimeInstant {
    /// The same instant moved by `offset` seconds, under a sibling URI.
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            uri: make_uri(&self.uri, true),
            at: self.at + offset,
            timeline: self.timeline.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeInterval {
    pub uri: String,
    pub start: f64,
    pub duration: f64,
    pub timeline: String,
}

impl TimeInterval {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// The same interval moved by `offset` seconds, under a sibling URI.
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            uri: make_uri(&self.uri, true),
            start: self.start + offset,
            duration: self.duration,
            timeline: self.timeline.clone(),
        }
    }
}

/// Either kind of temporal entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Temporal {
    Instant(TimeInstant),
    Interval(TimeInterval),
}

impl Temporal {
    pub fn uri(&self) -> &str {
        match self {
            Temporal::Instant(instant) => &instant.uri,
            Temporal::Interval(interval) => &interval.uri,
        }
    }

    pub fn start(&self) -> f64 {
        match self {
            Temporal::Instant(instant) => instant.at,
            Temporal::Interval(interval) => interval.start,
        }
    }

    pub fn end(&self) -> f64 {
        match self {
            Temporal::Instant(instant) => instant.at,
            Temporal::Interval(interval) => interval.end(),
        }
    }

    pub fn shifted(&self, offset: f64) -> Self {
        match self {
            Temporal::Instant(instant) => Temporal::Instant(instant.shifted(offset)),
            Temporal::Interval(interval) => Temporal::Interval(interval.shifted(offset)),
        }
    }

    /// A read request covering this span of time.
    pub fn to_request(&self) -> ReadRequest {
        ReadRequest::new().interval(self.start(), self.end())
    }
}
