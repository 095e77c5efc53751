//! Holder for the page's registry.
//!
//! The page callback runs while the registry is borrowed, and it may call the
//! registration hook again (or even try to install another consumer). Those
//! nested calls must not abort the page, so submissions go through an inbox
//! that whichever call currently holds the registry drains before returning.

use std::cell::RefCell;
use std::collections::VecDeque;

use fragment::FragmentBatch;
use registry::{FragmentConsumer, FragmentRegistry, RegistryError, RegistryResult, RegistryStats};

pub struct PageSlot<C> {
    registry: RefCell<Option<FragmentRegistry<C>>>,
    inbox: RefCell<VecDeque<FragmentBatch>>,
}

impl<C: FragmentConsumer> Default for PageSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FragmentConsumer> PageSlot<C> {
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(None),
            inbox: RefCell::new(VecDeque::new()),
        }
    }

    /// True once a consumer is installed, or while an install is running.
    pub fn is_installed(&self) -> bool {
        self.registry
            .try_borrow()
            .map_or(true, |registry| registry.is_some())
    }

    /// Installs `consumer`, delivering `pending` batches first, in order,
    /// followed by anything submitted before the install.
    ///
    /// Returns the number of fragments flushed from `pending`.
    pub fn install<I>(&self, pending: I, consumer: C) -> RegistryResult<usize>
    where
        I: IntoIterator<Item = FragmentBatch>,
    {
        let drained = {
            let mut slot = self
                .registry
                .try_borrow_mut()
                .map_err(|_| RegistryError::ConsumerAlreadyInstalled)?;
            if slot.is_some() {
                return Err(RegistryError::ConsumerAlreadyInstalled);
            }

            let mut registry = FragmentRegistry::new();
            for batch in pending {
                registry.submit_batch(batch);
            }
            slot.insert(registry).install_consumer(consumer)?
        };
        self.flush();
        Ok(drained)
    }

    /// Submits a batch. Delivered before returning unless a delivery further
    /// up the stack holds the registry; that delivery drains it instead.
    pub fn submit(&self, batch: FragmentBatch) {
        self.inbox.borrow_mut().push_back(batch);
        self.flush();
    }

    /// Counters of the installed registry; `None` before install or while a
    /// delivery is running.
    pub fn stats(&self) -> Option<RegistryStats> {
        let slot = self.registry.try_borrow().ok()?;
        slot.as_ref().map(FragmentRegistry::stats)
    }

    /// Batches waiting in the inbox.
    pub fn inbox_len(&self) -> usize {
        self.inbox.borrow().len()
    }

    fn flush(&self) {
        let Ok(mut slot) = self.registry.try_borrow_mut() else {
            return;
        };
        let Some(registry) = slot.as_mut() else {
            return;
        };
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(batch) = next else {
                break;
            };
            registry.submit_batch(batch);
        }
    }
}
