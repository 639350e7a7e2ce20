//! Year downsampling for chart legibility.
//!
//! A language with decades of data would crowd the x-axis, so the chart keeps
//! at most `max_points` evenly spaced years. Sampling picks years, not row
//! positions: rows whose year is not one of the targets are dropped even if
//! that leaves fewer than `max_points` rows.

use crate::types::AggregateRow;
use std::collections::BTreeSet;

/// Default number of years plotted per chart.
pub const DEFAULT_MAX_POINTS: usize = 20;

/// `points` evenly spaced years over `[first, last]`, truncated toward zero.
///
/// The last target is always `last`.
pub fn target_years(first: i32, last: i32, points: usize) -> BTreeSet<i32> {
    match points {
        0 => BTreeSet::new(),
        1 => BTreeSet::from([first]),
        _ => {
            let step = f64::from(last - first) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        last
                    } else {
                        (f64::from(first) + step * i as f64).trunc() as i32
                    }
                })
                .collect()
        }
    }
}

/// Keep at most `max_points` evenly spaced years of a year-sorted series.
///
/// Series of `max_points` rows or fewer come back unchanged.
pub fn sample_years(rows: &[AggregateRow], max_points: usize) -> Vec<AggregateRow> {
    if rows.len() <= max_points {
        return rows.to_vec();
    }

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };

    let targets = target_years(first.year, last.year, max_points);
    rows.iter()
        .filter(|row| targets.contains(&row.year))
        .cloned()
        .collect()
}
