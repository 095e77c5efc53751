//! Rules for turning an implementors map handed over by a page script into a
//! batch.

use fragment::{Fragment, FragmentBatch, GroupName};
use thiserror::Error;

/// A group's value as read from the page: `None` when it is not an array,
/// otherwise one item per element, `None` for elements that are not strings.
pub type RawEntries = Option<Vec<Option<String>>>;

/// Why a group was left out of the batch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Skip {
    #[error("implementors group with an empty name")]
    EmptyName,

    #[error("implementors group `{0}`: value is not an array")]
    NotArray(GroupName),

    #[error("implementors group `{group}`: entry {index} is not a string")]
    NonString { group: GroupName, index: usize },
}

/// Builds a batch from `(group, entries)` pairs in key order.
///
/// Malformed groups are skipped and reported; the rest of the map is kept.
pub fn decode_map<I>(groups: I) -> (FragmentBatch, Vec<Skip>)
where
    I: IntoIterator<Item = (String, RawEntries)>,
{
    let mut batch = FragmentBatch::new();
    let mut skipped = Vec::new();
    for (name, entries) in groups {
        match decode_group(name, entries) {
            Ok(fragment) => batch.insert(fragment),
            Err(skip) => skipped.push(skip),
        }
    }
    (batch, skipped)
}

fn decode_group(name: String, entries: RawEntries) -> Result<Fragment, Skip> {
    let group = GroupName::new(name).map_err(|_| Skip::EmptyName)?;
    let Some(entries) = entries else {
        return Err(Skip::NotArray(group));
    };
    let mut html = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Some(entry) => html.push(entry),
            None => return Err(Skip::NonString { group, index }),
        }
    }
    Ok(Fragment::new(group, html))
}
