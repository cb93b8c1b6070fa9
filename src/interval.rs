// WHY: every token and sentence span is an Interval over character offsets of the raw text
// Ordering key is (start ascending, length descending); equality and hash use (start, end) only

use anyhow::{bail, Result};
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::fmt;

/// Half-open range `[start, end)` of character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: usize,
    end: usize,
}

impl Interval {
    /// Create a new interval, rejecting `end < start`
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            bail!("Start \"{start}\" must not be greater than end \"{end}\"");
        }
        Ok(Self { start, end })
    }

    /// Create an interval from signed bounds, rejecting negative starts
    pub fn try_from_signed(start: i64, end: i64) -> Result<Self> {
        if start < 0 {
            bail!("Start \"{start}\" must not be negative");
        }
        if start > end {
            bail!("Start \"{start}\" must not be greater than end \"{end}\"");
        }
        Self::new(start as usize, end as usize)
    }

    /// Zero-length interval anchored at `point`
    pub fn empty_at(point: usize) -> Self {
        Self { start: point, end: point }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start <= point < end`
    pub fn contains(&self, point: usize) -> bool {
        self.start <= point && point < self.end
    }

    /// Sort the pair by the interval ordering, earlier first
    fn ordered<'a>(&'a self, other: &'a Interval) -> (&'a Interval, &'a Interval) {
        if self <= other {
            (self, other)
        } else {
            (other, self)
        }
    }

    /// Interval common to `self` and `other`
    ///
    /// Disjoint pairs yield a zero-length interval anchored at the start of
    /// the earlier interval, so `a.intersection(&b) == b.intersection(&a)`.
    pub fn intersection(&self, other: &Interval) -> Interval {
        let (a, b) = self.ordered(other);
        if a.end <= b.start {
            return Interval::empty_at(a.start);
        }
        Interval {
            start: b.start,
            end: a.end.min(b.end),
        }
    }

    /// True if some position lies in both intervals
    pub fn overlaps(&self, other: &Interval) -> bool {
        let (a, b) = self.ordered(other);
        a.end > b.start
    }

    /// Shift both bounds by `offset`
    pub fn translate(&self, offset: isize) -> Result<Interval> {
        match (
            self.start.checked_add_signed(offset),
            self.end.checked_add_signed(offset),
        ) {
            (Some(start), Some(end)) => Interval::new(start, end),
            _ => bail!("Cannot translate {self} by {offset}: bounds leave the valid range"),
        }
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, Reverse(self.len())).cmp(&(other.start, Reverse(other.len())))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval[{}, {}]", self.start, self.end)
    }
}

/// Shared range capability for values that occupy a span of the document text
///
/// Tokens and sentences embed an [`Interval`] and forward the range algebra
/// to it through this trait.
pub trait Spanned {
    fn interval(&self) -> Interval;

    fn start(&self) -> usize {
        self.interval().start()
    }

    fn end(&self) -> usize {
        self.interval().end()
    }

    fn len(&self) -> usize {
        self.interval().len()
    }

    fn is_empty(&self) -> bool {
        self.interval().is_empty()
    }

    fn contains(&self, point: usize) -> bool {
        self.interval().contains(point)
    }

    fn overlaps<S: Spanned + ?Sized>(&self, other: &S) -> bool {
        self.interval().overlaps(&other.interval())
    }

    fn intersection<S: Spanned + ?Sized>(&self, other: &S) -> Interval {
        self.interval().intersection(&other.interval())
    }
}

impl Spanned for Interval {
    fn interval(&self) -> Interval {
        *self
    }
}
