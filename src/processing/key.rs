//! Group-key derivation and partitioning of records into groups.
//!
//! A record's group key is its dimension values joined by a delimiter, in dimension order.
//! Values that contain the delimiter can make two distinct dimension tuples serialize to the
//! same key (`["a-b", "c"]` and `["a", "b-c"]` both give `a-b-c`); such records share a group.
//! Floats are keyed by their shortest round-trip decimal form (`1e21` keys as
//! `1000000000000000000000`), so a float and a string spelling the same number in exponent
//! notation land in different groups.

use std::collections::HashMap;

use crate::types::{Record, Value};

use super::aggregate::AggregateOptions;

/// Key shared by every record when no dimensions are selected.
pub const GLOBAL_GROUP_KEY: &str = "all";

/// Maps records to their group key.
#[derive(Debug, Clone, Copy)]
pub struct KeyDeriver<'a> {
    dimensions: &'a [String],
    delimiter: &'a str,
    placeholder: &'a str,
}

impl<'a> KeyDeriver<'a> {
    /// Create a deriver for `dimensions` using the delimiter and placeholder from `options`.
    pub fn new(dimensions: &'a [String], options: &'a AggregateOptions) -> Self {
        Self {
            dimensions,
            delimiter: &options.key_delimiter,
            placeholder: &options.missing_placeholder,
        }
    }

    /// Derive the group key for `record`.
    ///
    /// A dimension whose value is blank contributes the placeholder; see [`is_blank`].
    pub fn key(&self, record: &Record) -> String {
        if self.dimensions.is_empty() {
            return GLOBAL_GROUP_KEY.to_string();
        }

        let mut key = String::new();
        for (i, dim) in self.dimensions.iter().enumerate() {
            if i > 0 {
                key.push_str(self.delimiter);
            }
            match record.value(dim) {
                v if is_blank(v) => key.push_str(self.placeholder),
                Value::Utf8(s) => key.push_str(s),
                other => key.push_str(&other.to_string()),
            }
        }
        key
    }
}

/// Whether `value` keys as the missing-value placeholder.
///
/// Absent fields read as `Null`. Besides `Null`, the empty string, `false`, integer and float
/// zero, and `NaN` are all blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Utf8(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Int64(n) => *n == 0,
        Value::Float64(f) => *f == 0.0 || f.is_nan(),
    }
}

/// Records sharing one group key, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'d> {
    /// The derived group key.
    pub key: String,
    /// Member records in the order they appear in the dataset.
    pub members: Vec<&'d Record>,
}

/// Partition `dataset` by group key.
///
/// Groups are returned in the order their key is first encountered.
pub fn group_records<'d>(dataset: &'d [Record], deriver: &KeyDeriver<'_>) -> Vec<Group<'d>> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<'d>> = Vec::new();

    for record in dataset {
        let key = deriver.key(record);
        match slots.get(&key) {
            Some(&idx) => groups[idx].members.push(record),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    groups
}
