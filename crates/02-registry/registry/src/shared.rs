//! Lock-guarded registry for hosts where producers and the consumer are held
//! by different owners.
//!
//! Delivery to the consumer happens while the lock is held, so the order in
//! which producers acquire the lock is the order the consumer observes. The
//! lock is not reentrant: a consumer must not submit back into the registry
//! that is delivering to it.

use std::sync::Arc;

use fragment::{Fragment, FragmentBatch};
use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::consumer::{BoxedConsumer, FragmentConsumer};
use crate::error::RegistryResult;
use crate::registry::{FragmentRegistry, Phase, RegistryStats, SubmitOutcome};

pub struct SharedRegistry<C = BoxedConsumer> {
    inner: Arc<Mutex<FragmentRegistry<C>>>,
}

impl<C> Clone for SharedRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: FragmentConsumer> Default for SharedRegistry<C> {
    fn default() -> Self {
        Self::new(FragmentRegistry::default())
    }
}

impl<C: FragmentConsumer> From<FragmentRegistry<C>> for SharedRegistry<C> {
    fn from(registry: FragmentRegistry<C>) -> Self {
        Self::new(registry)
    }
}

impl<C: FragmentConsumer> SharedRegistry<C> {
    pub fn new(registry: FragmentRegistry<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Returns a handle that can only submit fragments.
    pub fn producer(&self) -> RegistryProducer<C> {
        RegistryProducer {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn submit(&self, fragment: Fragment) -> SubmitOutcome {
        self.inner.lock().submit(fragment)
    }

    pub fn submit_batch(&self, batch: FragmentBatch) -> SmallVec<[SubmitOutcome; 4]> {
        self.inner.lock().submit_batch(batch)
    }

    pub fn install_consumer(&self, consumer: C) -> RegistryResult<usize> {
        self.inner.lock().install_consumer(consumer)
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending_len()
    }

    pub fn stats(&self) -> RegistryStats {
        self.inner.lock().stats()
    }

    /// Runs `f` against the installed consumer, if any.
    pub fn with_consumer<R>(&self, f: impl FnOnce(Option<&C>) -> R) -> R {
        f(self.inner.lock().consumer())
    }
}

/// Submit-only handle onto a [`SharedRegistry`].
pub struct RegistryProducer<C = BoxedConsumer> {
    inner: Arc<Mutex<FragmentRegistry<C>>>,
}

impl<C> Clone for RegistryProducer<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: FragmentConsumer> RegistryProducer<C> {
    pub fn submit(&self, fragment: Fragment) -> SubmitOutcome {
        self.inner.lock().submit(fragment)
    }

    pub fn submit_batch(&self, batch: FragmentBatch) -> SmallVec<[SubmitOutcome; 4]> {
        self.inner.lock().submit_batch(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::Collector;
    use std::thread;

    fn fragment(group: &str) -> Fragment {
        Fragment::try_new(group, ["<impl>"]).expect("fragment")
    }

    #[test]
    fn producers_on_other_threads_are_buffered_until_install() {
        let shared = SharedRegistry::<Collector>::default();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let producer = shared.producer();
                thread::spawn(move || {
                    for idx in 0..8 {
                        producer.submit(fragment(&format!("w{worker}_{idx}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("producer thread");
        }

        assert_eq!(shared.phase(), Phase::Pending);
        assert_eq!(shared.pending_len(), 32);
        assert_eq!(shared.install_consumer(Collector::new()), Ok(32));

        // Each producer's own fragments keep their relative order.
        shared.with_consumer(|consumer| {
            let delivered = consumer.map(Collector::fragments).unwrap_or_default();
            for worker in 0..4 {
                let prefix = format!("w{worker}_");
                let order: Vec<_> = delivered
                    .iter()
                    .filter_map(|f| f.group().as_str().strip_prefix(prefix.as_str()))
                    .map(|idx| idx.parse::<u32>().expect("index"))
                    .collect();
                assert_eq!(order, (0..8).collect::<Vec<_>>());
            }
        });
    }

    #[test]
    fn producer_after_install_delivers_directly() {
        let shared = SharedRegistry::<Collector>::default();
        let producer = shared.producer();
        shared.install_consumer(Collector::new()).expect("install");

        assert_eq!(producer.submit(fragment("g")), SubmitOutcome::Delivered);
        assert_eq!(shared.pending_len(), 0);
        assert_eq!(shared.stats().delivered, 1);
    }
}
