//! Channel rendition of deferred registration.
//!
//! Senders publish fragments at any time; the single receiver drains what was
//! published so far, in publish order, and keeps receiving afterwards. Nothing
//! is lost while no one is draining.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use fragment::{Fragment, FragmentBatch};
use tracing::debug;

use crate::consumer::FragmentConsumer;
use crate::error::{RegistryError, RegistryResult};

/// Creates an unbounded fragment channel.
pub fn channel() -> (FragmentSender, FragmentReceiver) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (FragmentSender { tx }, FragmentReceiver { rx })
}

#[derive(Clone, Debug)]
pub struct FragmentSender {
    tx: Sender<Fragment>,
}

impl FragmentSender {
    pub fn send(&self, fragment: Fragment) -> RegistryResult<()> {
        self.tx
            .send(fragment)
            .map_err(|_| RegistryError::Disconnected)
    }

    pub fn send_batch(&self, batch: FragmentBatch) -> RegistryResult<()> {
        batch.into_iter().try_for_each(|fragment| self.send(fragment))
    }
}

#[derive(Debug)]
pub struct FragmentReceiver {
    rx: Receiver<Fragment>,
}

impl FragmentReceiver {
    /// Number of fragments published but not yet drained.
    pub fn pending_len(&self) -> usize {
        self.rx.len()
    }

    /// Delivers every fragment published so far to `consumer`, oldest first.
    pub fn drain_into<C: FragmentConsumer>(&self, consumer: &mut C) -> usize {
        let mut drained = 0;
        for fragment in self.rx.try_iter() {
            consumer.consume(fragment);
            drained += 1;
        }
        debug!(drained, "drained fragment channel");
        drained
    }

    /// Returns the next fragment if one is waiting.
    ///
    /// `Ok(None)` means the channel is empty but senders remain.
    pub fn try_recv(&self) -> RegistryResult<Option<Fragment>> {
        match self.rx.try_recv() {
            Ok(fragment) => Ok(Some(fragment)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RegistryError::Disconnected),
        }
    }

    /// Blocks until a fragment arrives or every sender is dropped.
    pub fn recv(&self) -> RegistryResult<Fragment> {
        self.rx.recv().map_err(|_| RegistryError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::Collector;

    fn fragment(group: &str) -> Fragment {
        Fragment::try_new(group, ["<impl>"]).expect("fragment")
    }

    #[test]
    fn drain_delivers_in_publish_order() {
        let (tx, rx) = channel();
        let other = tx.clone();
        tx.send(fragment("a")).expect("send");
        other.send(fragment("b")).expect("send");
        tx.send(fragment("c")).expect("send");
        assert_eq!(rx.pending_len(), 3);

        let mut collector = Collector::new();
        assert_eq!(rx.drain_into(&mut collector), 3);
        let groups: Vec<_> = collector.fragments().iter().map(|f| f.group().as_str()).collect();
        assert_eq!(groups, ["a", "b", "c"]);

        tx.send(fragment("d")).expect("send");
        let next = rx.try_recv().expect("recv");
        assert_eq!(next.map(|f| f.group().to_string()), Some("d".to_string()));
        assert_eq!(rx.try_recv(), Ok(None));
    }

    #[test]
    fn dropped_senders_disconnect() {
        let (tx, rx) = channel();
        tx.send(fragment("a")).expect("send");
        drop(tx);

        assert_eq!(rx.recv().map(|f| f.group().to_string()), Ok("a".to_string()));
        assert_eq!(rx.recv(), Err(RegistryError::Disconnected));
        assert_eq!(rx.try_recv(), Err(RegistryError::Disconnected));
    }

    #[test]
    fn send_after_receiver_drop_fails() {
        let (tx, rx) = channel();
        drop(rx);
        assert_eq!(tx.send(fragment("a")), Err(RegistryError::Disconnected));
    }
}
