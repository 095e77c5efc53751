use std::collections::{HashSet, VecDeque};

use fragment::{Fragment, FragmentBatch, GroupName};
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::config::{DuplicatePolicy, RegistryBuilder, RegistryConfig};
use crate::consumer::{BoxedConsumer, FragmentConsumer};
use crate::error::{RegistryError, RegistryResult};

/// Lifecycle phase of a registry. `Ready` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No consumer installed; submissions are queued.
    Pending,
    /// Consumer installed; submissions are delivered immediately.
    Ready,
}

/// Outcome returned when submitting a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SubmitOutcome {
    /// Handed to the installed consumer synchronously.
    Delivered,
    /// Appended to the pending queue.
    Queued,
    /// Merged into or replaced a queued fragment of the same group.
    Coalesced,
    /// Dropped because its group was already registered.
    Rejected,
}

/// Running counters for a registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub queued: u64,
    pub delivered: u64,
    pub coalesced: u64,
    pub rejected: u64,
}

/// Single-owner fragment registry.
///
/// Every fragment submitted while [`Phase::Pending`] is delivered to the
/// consumer exactly once, in submission order, when
/// [`install_consumer`](Self::install_consumer) runs. After that every
/// submission reaches the consumer before `submit` returns.
pub struct FragmentRegistry<C = BoxedConsumer> {
    config: RegistryConfig,
    consumer: Option<C>,
    pending: VecDeque<Fragment>,
    seen: HashSet<GroupName>,
    stats: RegistryStats,
}

impl<C: FragmentConsumer> Default for FragmentRegistry<C> {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl FragmentRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }
}

impl<C: FragmentConsumer> FragmentRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            consumer: None,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            stats: RegistryStats::default(),
        }
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        if self.consumer.is_some() {
            Phase::Ready
        } else {
            Phase::Pending
        }
    }

    pub fn is_ready(&self) -> bool {
        self.consumer.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Fragments waiting for a consumer, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Fragment> {
        self.pending.iter()
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    pub fn consumer(&self) -> Option<&C> {
        self.consumer.as_ref()
    }

    pub fn consumer_mut(&mut self) -> Option<&mut C> {
        self.consumer.as_mut()
    }

    /// Submits a fragment. Never fails; rejection under
    /// [`DuplicatePolicy::Reject`] is reported through the outcome.
    pub fn submit(&mut self, fragment: Fragment) -> SubmitOutcome {
        if self.config.duplicate_policy == DuplicatePolicy::Reject
            && !self.seen.insert(fragment.group().clone())
        {
            warn!(group = %fragment.group(), "rejecting fragment for already registered group");
            self.stats.rejected += 1;
            return SubmitOutcome::Rejected;
        }

        match self.consumer.as_mut() {
            Some(consumer) => {
                debug!(group = %fragment.group(), entries = fragment.len(), "delivering fragment");
                consumer.consume(fragment);
                self.stats.delivered += 1;
                SubmitOutcome::Delivered
            }
            None => self.enqueue(fragment),
        }
    }

    /// Submits every fragment of a batch, in batch order.
    pub fn submit_batch(&mut self, batch: FragmentBatch) -> SmallVec<[SubmitOutcome; 4]> {
        batch
            .into_iter()
            .map(|fragment| self.submit(fragment))
            .collect()
    }

    /// Installs the consumer and flushes the pending queue into it.
    ///
    /// Returns the number of fragments flushed. A registry accepts exactly one
    /// consumer; later calls fail and leave the installed consumer in place.
    pub fn install_consumer(&mut self, consumer: C) -> RegistryResult<usize> {
        if self.consumer.is_some() {
            warn!("rejecting second fragment consumer");
            return Err(RegistryError::ConsumerAlreadyInstalled);
        }

        let consumer = self.consumer.insert(consumer);
        let drained = self.pending.len();
        for fragment in self.pending.drain(..) {
            consumer.consume(fragment);
        }
        self.stats.delivered += drained as u64;

        info!(drained, "fragment consumer installed");
        Ok(drained)
    }

    /// Tears the registry down, returning fragments that never reached a
    /// consumer.
    pub fn into_pending(self) -> Vec<Fragment> {
        self.pending.into()
    }

    pub fn into_consumer(self) -> Option<C> {
        self.consumer
    }

    fn enqueue(&mut self, fragment: Fragment) -> SubmitOutcome {
        let policy = self.config.duplicate_policy;
        if matches!(policy, DuplicatePolicy::Merge | DuplicatePolicy::Replace) {
            if let Some(queued) = self
                .pending
                .iter_mut()
                .find(|queued| queued.group() == fragment.group())
            {
                debug!(group = %fragment.group(), ?policy, "coalescing pending fragment");
                if policy == DuplicatePolicy::Merge {
                    queued.extend_entries(fragment.into_entries());
                } else {
                    *queued = fragment;
                }
                self.stats.coalesced += 1;
                return SubmitOutcome::Coalesced;
            }
        }

        debug!(group = %fragment.group(), entries = fragment.len(), "queueing fragment");
        self.pending.push_back(fragment);
        self.stats.queued += 1;
        SubmitOutcome::Queued
    }
}
