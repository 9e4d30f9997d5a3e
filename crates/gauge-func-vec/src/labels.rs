//! Label helpers
//!
//! Canonical keys identify a label combination inside a [`GaugeFuncVec`]
//! and in registration errors. They are never exported to a scrape.
//!
//! [`GaugeFuncVec`]: crate::GaugeFuncVec

use prometheus::proto::LabelPair;
use std::collections::HashMap;

/// Build a single label pair
pub fn label_pair(name: &str, value: &str) -> LabelPair {
    let mut pair = LabelPair::default();
    pair.set_name(name.to_string());
    pair.set_value(value.to_string());
    pair
}

/// Convert a label mapping into pairs sorted by name
pub fn label_pairs<K, V>(labels: &HashMap<K, V>) -> Vec<LabelPair>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<LabelPair> = labels
        .iter()
        .map(|(name, value)| label_pair(name.as_ref(), value.as_ref()))
        .collect();
    sort_by_name(&mut pairs);
    pairs
}

/// Sort pairs lexicographically by label name
pub fn sort_by_name(pairs: &mut [LabelPair]) {
    pairs.sort_by(|a, b| a.get_name().cmp(b.get_name()));
}

/// Sorted label names of a mapping
pub fn label_names<K, V>(labels: &HashMap<K, V>) -> Vec<String>
where
    K: AsRef<str>,
{
    let mut names: Vec<String> = labels.keys().map(|k| k.as_ref().to_string()).collect();
    names.sort();
    names
}

/// Render already sorted pairs as `{a="1",b="2"}`.
///
/// Values are quoted with Rust string escaping, so distinct values always
/// render to distinct keys.
pub fn label_pairs_to_key(pairs: &[LabelPair]) -> String {
    let rendered: Vec<String> = pairs
        .iter()
        .map(|p| format!("{}={:?}", p.get_name(), p.get_value()))
        .collect();
    format!("{{{}}}", rendered.join(","))
}

/// Canonical key of `labels` merged with the (sorted) constant pairs
pub fn canonical_key<K, V>(const_pairs: &[LabelPair], labels: &HashMap<K, V>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    label_pairs_to_key(&merge(const_pairs, labels))
}

/// Constant pairs plus the given labels, sorted by name
pub(crate) fn merge<K, V>(const_pairs: &[LabelPair], labels: &HashMap<K, V>) -> Vec<LabelPair>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs = Vec::with_capacity(const_pairs.len() + labels.len());
    pairs.extend_from_slice(const_pairs);
    pairs.extend(label_pairs(labels));
    sort_by_name(&mut pairs);
    pairs
}

/// Format a name list the way errors report it: `[a b c]`
pub(crate) fn format_names(names: &[String]) -> String {
    format!("[{}]", names.join(" "))
}
