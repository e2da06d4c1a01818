//! Segmented reads.
//!
//! A read request names the samples wanted (a time interval, an inclusive
//! index range, or the whole signal) and optional caps on the size of each
//! returned segment. [`SegmentReader`] resolves the request to one index
//! range up front and then lazily pulls bounded slices from the store,
//! yielding a [`DataSegment`] per slice.
//!
//! # Chunk size
//!
//! - `max_duration` on a uniform clock converts to `round(rate * duration)`
//!   points once per read. On an explicit clock it is converted at the
//!   current read position for every chunk, since sample spacing varies.
//! - With both caps the smaller wins.
//! - No cap, or a cap outside `(0, max_allowed_points]`, falls back to
//!   `ReaderConfig::max_allowed_points`.
//!
//! # Consistency
//!
//! Each reader owns its cursor, so several readers over one signal may be
//! advanced alternately. The store decides how many samples exist: a slice
//! shorter than requested advances the cursor by what was returned and an
//! empty slice ends the read.

use log::{debug, warn};

use crate::core::config::ReaderConfig;
use crate::core::store::SignalStore;
use crate::core::{Clock, DataSegment, Error, Result, TimeSeries};

/// Which samples a read covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Addressing {
    /// Samples from `index_at(start)` to `index_at(end)` inclusive.
    Interval { start: f64, end: f64 },
    /// Inclusive index range, in either order.
    IndexRange(usize, usize),
    /// The whole signal.
    All,
}

/// Parameters of a segmented read.
///
/// # Example
///
/// ```
/// use biosignal::ReadRequest;
///
/// let request = ReadRequest::new().range(0, 999).max_points(300);
/// assert!(request.addressing().is_ok());
///
/// let conflicting = ReadRequest::new().range(0, 9).interval(0.0, 1.0);
/// assert!(conflicting.addressing().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReadRequest {
    interval: Option<(f64, f64)>,
    range: Option<(usize, usize)>,
    max_duration: Option<f64>,
    max_points: Option<usize>,
}

impl ReadRequest {
    /// A request for the whole signal with no chunk caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Address by time interval, in seconds.
    pub fn interval(mut self, start: f64, end: f64) -> Self {
        self.interval = Some((start, end));
        self
    }

    /// Address by inclusive index range.
    pub fn range(mut self, a: usize, b: usize) -> Self {
        self.range = Some((a, b));
        self
    }

    /// Cap each segment's duration, in seconds.
    pub fn max_duration(mut self, seconds: f64) -> Self {
        self.max_duration = Some(seconds);
        self
    }

    /// Cap each segment's length, in samples.
    pub fn max_points(mut self, points: usize) -> Self {
        self.max_points = Some(points);
        self
    }

    /// The single addressing mode this request uses.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument`: both an interval and an index range were
    ///   given, or an interval bound or the duration cap is NaN
    pub fn addressing(&self) -> Result<Addressing> {
        if self.max_duration.is_some_and(f64::is_nan) {
            return Err(Error::invalid("max_duration must be a number"));
        }
        match (self.interval, self.range) {
            (Some(_), Some(_)) => Err(Error::invalid(
                "interval and index range cannot both be specified",
            )),
            (Some((start, end)), None) => {
                if start.is_nan() || end.is_nan() {
                    return Err(Error::invalid("interval bounds must be numbers"));
                }
                Ok(Addressing::Interval { start, end })
            }
            (None, Some((a, b))) => Ok(Addressing::IndexRange(a, b)),
            (None, None) => Ok(Addressing::All),
        }
    }
}

/// Resolved per-segment size limit.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ChunkLimit {
    Fixed(usize),
    /// Duration cap on an explicit clock, converted at each chunk.
    ByTime {
        max_points: Option<usize>,
        max_duration: f64,
        ceiling: usize,
    },
}

impl ChunkLimit {
    fn resolve(
        clock: &Clock,
        max_duration: Option<f64>,
        max_points: Option<usize>,
        ceiling: usize,
    ) -> Self {
        // A zero duration is treated as "no duration cap".
        match (clock, max_duration.filter(|d| *d != 0.0)) {
            (Clock::Uniform { rate }, Some(duration)) => {
                let points = (rate * duration).round();
                ChunkLimit::Fixed(arbitrate(max_points, Some(points), ceiling))
            }
            (Clock::Explicit { .. }, Some(duration)) => ChunkLimit::ByTime {
                max_points,
                max_duration: duration,
                ceiling,
            },
            (_, None) => ChunkLimit::Fixed(arbitrate(max_points, None, ceiling)),
        }
    }

    fn points_at(&self, clock: &Clock, cursor: usize) -> Result<usize> {
        match *self {
            ChunkLimit::Fixed(points) => Ok(points),
            ChunkLimit::ByTime {
                max_points,
                max_duration,
                ceiling,
            } => {
                let points = if max_duration > 0.0 {
                    let until = clock.time_at(cursor)? + max_duration;
                    let end = clock.index_at(until);
                    end.saturating_sub(cursor).max(1) as f64
                } else {
                    0.0
                };
                Ok(arbitrate(max_points, Some(points), ceiling))
            }
        }
    }
}

fn arbitrate(max_points: Option<usize>, from_duration: Option<f64>, ceiling: usize) -> usize {
    let cap = match (max_points.map(|p| p as f64), from_duration) {
        (Some(points), Some(duration)) => Some(points.min(duration)),
        (points, duration) => points.or(duration),
    };
    match cap {
        Some(cap) if cap > 0.0 && cap <= ceiling as f64 => cap as usize,
        _ => ceiling,
    }
}

/// Lazy, finite sequence of [`DataSegment`]s over one index range.
///
/// Dropping a partly consumed reader releases nothing beyond itself.
pub struct SegmentReader<'a> {
    store: &'a dyn SignalStore,
    clock: &'a Clock,
    limit: ChunkLimit,
    cursor: usize,
    remaining: usize,
    done: bool,
}

impl<'a> SegmentReader<'a> {
    /// Resolve `request` against a signal of `len` samples.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument`: conflicting or malformed addressing
    pub fn open(
        store: &'a dyn SignalStore,
        clock: &'a Clock,
        len: usize,
        request: &ReadRequest,
        config: &ReaderConfig,
    ) -> Result<Self> {
        let addressing = request.addressing()?;
        let (start, end) = match addressing {
            Addressing::Interval { start, end } => {
                ordered(clock.index_at(start), clock.index_at(end))
            }
            Addressing::IndexRange(a, b) => ordered(a, b),
            Addressing::All => (0, len.saturating_sub(1)),
        };
        let remaining = if start >= len {
            0
        } else {
            end.min(len - 1) - start + 1
        };
        let limit = ChunkLimit::resolve(
            clock,
            request.max_duration,
            request.max_points,
            config.max_allowed_points,
        );
        debug!(
            "read {:?} resolved to start={} remaining={} limit={:?}",
            addressing, start, remaining, limit
        );

        Ok(Self {
            store,
            clock,
            limit,
            cursor: start,
            remaining,
            done: false,
        })
    }

    /// Index of the next sample to be read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Samples still to be read, as resolved when the reader was opened.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn read_chunk(&mut self) -> Result<Option<DataSegment>> {
        let wanted = self
            .limit
            .points_at(self.clock, self.cursor)?
            .min(self.remaining);
        let mut values = self.store.slice(self.cursor, wanted)?;
        values.truncate(wanted);
        let n = values.len();
        if n == 0 {
            warn!(
                "store returned no samples at index {} with {} still expected",
                self.cursor, self.remaining
            );
            return Ok(None);
        }

        let segment = match self.clock {
            Clock::Uniform { rate } => DataSegment::new(
                self.clock.time_at(self.cursor)?,
                TimeSeries::uniform(values, *rate)?,
            ),
            Clock::Explicit { .. } => {
                let times = self.clock.slice(self.cursor, self.cursor + n)?;
                DataSegment::new(0.0, TimeSeries::explicit(times.to_vec(), values)?)
            }
        };
        self.cursor += n;
        self.remaining -= n;
        Ok(Some(segment))
    }
}

impl Iterator for SegmentReader<'_> {
    type Item = Result<DataSegment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == 0 {
            return None;
        }
        match self.read_chunk() {
            Ok(Some(segment)) => Some(Ok(segment)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
