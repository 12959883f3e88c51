//! Attribute importance aggregation across trees.

use std::collections::BTreeMap;

use serde::Serialize;

/// A ranked attribute with name, importance score, and rank.
#[derive(Debug, Clone, Serialize)]
pub struct RankedAttribute {
    /// The token.
    pub name: String,
    /// Normalized importance score (sums to 1.0 across all attributes when any tree split).
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

/// Aggregate per-tree weighted gains into ranked attributes.
///
/// Every candidate in `names` is reported, with 0 importance when no tree
/// split on it. Totals are normalized to sum to 1.0, sorted descending, and
/// ties are ordered by name.
pub(crate) fn aggregate_importances(
    per_tree: &[BTreeMap<&str, f64>],
    names: &[&str],
) -> Vec<RankedAttribute> {
    let mut totals: BTreeMap<&str, f64> = names.iter().map(|&name| (name, 0.0)).collect();
    for gains in per_tree {
        for (&name, &gain) in gains {
            if let Some(total) = totals.get_mut(name) {
                *total += gain;
            }
        }
    }

    let sum: f64 = totals.values().sum();
    if sum > 0.0 {
        totals.values_mut().for_each(|v| *v /= sum);
    }

    let mut ranked: Vec<RankedAttribute> = totals
        .into_iter()
        .map(|(name, importance)| RankedAttribute {
            name: name.to_string(),
            importance,
            rank: 0,
        })
        .collect();

    // Stable sort keeps the alphabetical order from the map for equal scores.
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for (i, attribute) in ranked.iter_mut().enumerate() {
        attribute.rank = i + 1;
    }

    ranked
}
