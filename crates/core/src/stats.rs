// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Summary statistics over record values.

/// Median of `values`; the mean of the two middle values for even lengths.
/// `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sum of `values`; `None` for an empty slice so callers can tell "no data"
/// from a zero total.
pub fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}
