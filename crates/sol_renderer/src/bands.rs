//! Row-band partitioning for multithreaded rendering.
//!
//! Each worker owns one contiguous band of image rows, so workers write
//! disjoint slices of the output buffer.

use std::ops::Range;

/// A contiguous range of image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band
    pub start: u32,
    /// One past the last row of the band
    pub end: u32,
    /// Index of the worker this band belongs to
    pub index: usize,
}

impl RowBand {
    pub fn new(start: u32, end: u32, index: usize) -> Self {
        Self { start, end, index }
    }

    pub fn rows(&self) -> Range<u32> {
        self.start..self.end
    }

    pub fn row_count(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `height` rows into `count` bands.
///
/// Band `t` starts at `t * height / count`; the last band always ends at
/// `height`, so every row lands in exactly one band. A `count` of 0 is
/// treated as 1.
pub fn partition_rows(height: u32, count: usize) -> Vec<RowBand> {
    let count = count.max(1);
    let boundary = |t: usize| (t as u64 * height as u64 / count as u64) as u32;

    (0..count)
        .map(|t| {
            let end = if t == count - 1 { height } else { boundary(t + 1) };
            RowBand::new(boundary(t), end, t)
        })
        .collect()
}
