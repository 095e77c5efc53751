use serde::{Deserialize, Serialize};

use crate::consumer::FragmentConsumer;
use crate::registry::FragmentRegistry;

/// How a registry treats a fragment whose group it has already seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Queue or deliver every fragment untouched.
    #[default]
    Forward,
    /// Append entries to the queued fragment of the same group.
    Merge,
    /// Replace the queued fragment of the same group, keeping its position.
    Replace,
    /// Drop any fragment whose group was already queued or delivered.
    Reject,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub duplicate_policy: DuplicatePolicy,
}

/// Builder for a [`FragmentRegistry`].
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    pub fn build<C: FragmentConsumer>(self) -> FragmentRegistry<C> {
        FragmentRegistry::with_config(self.config)
    }
}
