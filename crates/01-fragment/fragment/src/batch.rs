//! Ordered collection of fragments carried by a single script.
//!
//! On the wire a batch is an object mapping group names to entry arrays.
//! Object keys keep their first-insertion position, so a batch is kept as a
//! vector in insertion order rather than a hash map. [`FragmentBatch::insert`]
//! appends a repeated group's entries to the fragment already in the batch;
//! [`FragmentBatch::replace_or_push`] overwrites them the way re-assigning an
//! object key does.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::fragment::Fragment;
use crate::group::GroupName;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FragmentBatch {
    fragments: Vec<Fragment>,
}

impl FragmentBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment, merging its entries into an existing fragment for the
    /// same group.
    pub fn insert(&mut self, fragment: Fragment) {
        match self
            .fragments
            .iter_mut()
            .find(|existing| existing.group() == fragment.group())
        {
            Some(existing) => existing.extend_entries(fragment.into_entries()),
            None => self.fragments.push(fragment),
        }
    }

    /// Adds a fragment, replacing the entries of an existing fragment for the
    /// same group while keeping its position.
    pub fn replace_or_push(&mut self, fragment: Fragment) {
        match self
            .fragments
            .iter_mut()
            .find(|existing| existing.group() == fragment.group())
        {
            Some(existing) => *existing = fragment,
            None => self.fragments.push(fragment),
        }
    }

    pub fn get(&self, group: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|fragment| fragment.group() == group)
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupName> {
        self.fragments.iter().map(Fragment::group)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Number of groups in the batch.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.fragments.iter().map(Fragment::len).sum()
    }
}

impl From<Fragment> for FragmentBatch {
    fn from(fragment: Fragment) -> Self {
        Self {
            fragments: vec![fragment],
        }
    }
}

impl FromIterator<Fragment> for FragmentBatch {
    fn from_iter<T: IntoIterator<Item = Fragment>>(iter: T) -> Self {
        let mut batch = Self::new();
        batch.extend(iter);
        batch
    }
}

impl Extend<Fragment> for FragmentBatch {
    fn extend<T: IntoIterator<Item = Fragment>>(&mut self, iter: T) {
        for fragment in iter {
            self.insert(fragment);
        }
    }
}

impl IntoIterator for FragmentBatch {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}

impl<'a> IntoIterator for &'a FragmentBatch {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

impl Serialize for FragmentBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fragments.len()))?;
        for fragment in &self.fragments {
            map.serialize_entry(fragment.group(), fragment.entries())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FragmentBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BatchVisitor;

        impl<'de> Visitor<'de> for BatchVisitor {
            type Value = FragmentBatch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of group names to entry arrays")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut batch = FragmentBatch::new();
                while let Some((group, entries)) = access.next_entry::<GroupName, Vec<String>>()? {
                    batch.insert(Fragment::new(group, entries));
                }
                Ok(batch)
            }
        }

        deserializer.deserialize_map(BatchVisitor)
    }
}
