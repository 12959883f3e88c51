//! Entropy and information gain over binary presence tests.

use std::borrow::Borrow;

use crate::category::{Category, CategoryCounts};
use crate::example::Example;

/// Binary Shannon entropy (in bits) of an event with probability `p`.
///
/// Exactly 0 at `p == 0.0` and `p == 1.0`.
#[must_use]
pub fn entropy(p: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        return 0.0;
    }
    let q = 1.0 - p;
    -p * p.log2() - q * q.log2()
}

/// Fraction of `Positive` examples in a tally, 0 when the tally is empty.
fn positive_fraction(counts: &CategoryCounts) -> f64 {
    let total = counts.total();
    if total == 0 {
        0.0
    } else {
        counts.get(Category::Positive) as f64 / total as f64
    }
}

/// Reduction in label entropy from knowing whether `attribute` is present.
///
/// `H(C) - (P(x) * H(C | x) + P(!x) * H(C | !x))`, where an empty side
/// contributes zero entropy. Returns 0 for an empty example set.
#[must_use]
pub fn information_gain<E: Borrow<Example>>(attribute: &str, examples: &[E]) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }

    let mut overall = CategoryCounts::new();
    let mut present = CategoryCounts::new();
    let mut absent = CategoryCounts::new();
    for example in examples {
        let example: &Example = example.borrow();
        overall.add(example.actual());
        if example.contains(attribute) {
            present.add(example.actual());
        } else {
            absent.add(example.actual());
        }
    }

    let base = entropy(positive_fraction(&overall));
    let p_present = present.total() as f64 / overall.total() as f64;
    let p_absent = 1.0 - p_present;

    base - (p_present * entropy(positive_fraction(&present))
        + p_absent * entropy(positive_fraction(&absent)))
}

/// Return the candidate with the highest information gain, with its gain.
///
/// Ties go to the candidate that appears first in `attributes`. Returns
/// `None` when there are no candidates.
#[must_use]
pub fn best_attribute<'a, A, E>(attributes: &'a [A], examples: &[E]) -> Option<(&'a str, f64)>
where
    A: AsRef<str>,
    E: Borrow<Example>,
{
    let mut best: Option<(&str, f64)> = None;
    for attribute in attributes {
        let attribute = attribute.as_ref();
        let gain = information_gain(attribute, examples);
        if best.is_none_or(|(_, best_gain)| gain > best_gain) {
            best = Some((attribute, gain));
        }
    }
    best
}
