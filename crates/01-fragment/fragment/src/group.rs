use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FragmentError, FragmentResult};

/// Name of the crate a fragment's entries belong to (e.g. `rsx_dom`).
///
/// Group names are never empty. They are not unique across submissions;
/// how repeats are treated is up to whoever collects the fragments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupName(String);

impl GroupName {
    /// Creates a group name, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> FragmentResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(FragmentError::EmptyGroup);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for GroupName {
    type Error = FragmentError;

    fn try_from(value: String) -> FragmentResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for GroupName {
    type Error = FragmentError;

    fn try_from(value: &str) -> FragmentResult<Self> {
        Self::new(value)
    }
}

impl From<GroupName> for String {
    fn from(name: GroupName) -> Self {
        name.0
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GroupName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GroupName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
