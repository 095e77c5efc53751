use serde::{Deserialize, Serialize};

use crate::error::FragmentResult;
use crate::group::GroupName;

/// One group's pre-rendered documentation entries.
///
/// Entries are self-contained HTML strings. Their order is display order and
/// is preserved through every queue and codec. Nothing inspects the markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    group: GroupName,
    entries: Vec<String>,
}

impl Fragment {
    pub fn new<I, S>(group: GroupName, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group,
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a fragment from a raw group name, rejecting empty names.
    pub fn try_new<I, S>(group: impl Into<String>, entries: I) -> FragmentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(GroupName::new(group)?, entries))
    }

    pub fn group(&self) -> &GroupName {
        &self.group
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends entries after the existing ones, keeping their order.
    pub fn extend_entries<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.extend(entries.into_iter().map(Into::into));
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    pub fn into_parts(self) -> (GroupName, Vec<String>) {
        (self.group, self.entries)
    }
}
