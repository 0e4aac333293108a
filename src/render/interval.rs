// Copyright @yucwang 2026

use crate::math::constants::{ Float, FLOAT_MAX };

/// One continuous sub-range of ray parameter t, inclusive on both ends,
/// with the step length suggested by the volume that produced it.
/// Immutable after creation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval {
    pub t0: Float,
    pub t1: Float,
    pub step_length: Float,
}

impl Interval {
    pub fn new(t0: Float, t1: Float, step_length: Float) -> Self {
        Self { t0, t1, step_length }
    }
}

pub type IntervalVec = Vec<Interval>;

/// Merges a set of possibly-overlapping intervals into a sorted,
/// non-overlapping sequence covering exactly the union of the input.
/// Where inputs overlap, the finest (smallest) step length wins, so
/// multi-volume regions are stepped at the resolution of the most
/// detailed volume.
pub fn split_intervals(intervals: &IntervalVec) -> IntervalVec {
    // Zero or one intervals are already in canonical form.
    if intervals.len() < 2 {
        return intervals.clone();
    }

    let mut points = Vec::with_capacity(intervals.len() * 2);
    for interval in intervals {
        points.push(interval.t0);
        points.push(interval.t1);
    }

    points.sort_by(|a, b| a.total_cmp(b));
    points.dedup();

    let mut out_intervals = IntervalVec::new();
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let mut step_length = FLOAT_MAX;
        let mut found_interval = false;
        for interval in intervals {
            if interval.t0 < p1 && interval.t1 > p0 {
                step_length = step_length.min(interval.step_length);
                found_interval = true;
            }
        }
        if found_interval {
            out_intervals.push(Interval::new(p0, p1, step_length));
        }
    }

    out_intervals
}

/* Tests for intervals */
