///! Form value validation helpers

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Duplicate tracking for a list of form inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormValueDuplicate {
    /// Offending value keyed by input index
    pub refs: BTreeMap<usize, String>,
    pub has_duplicates: bool,
}

impl FormValueDuplicate {
    pub fn set(&mut self, refs: BTreeMap<usize, String>) {
        self.has_duplicates = !refs.is_empty();
        self.refs = refs;
    }
}

/// Indices of values that appear more than once. Blank values never count.
pub fn get_duplicates<S: AsRef<str>>(values: &[Option<S>]) -> BTreeMap<usize, String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.iter().flatten() {
        let value = value.as_ref();
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let value = value.as_ref()?.as_ref();
            match counts.get(value) {
                Some(count) if *count > 1 => Some((index, value.to_string())),
                _ => None,
            }
        })
        .collect()
}
