//! Deferred registration of documentation fragments.
//!
//! Fragment scripts load independently of the page script that renders them,
//! so a fragment may arrive before or after its consumer exists. The registry
//! resolves that race with a two-phase buffer-then-flush lifecycle:
//! * [`Phase::Pending`] – no consumer yet; submissions are queued in order.
//! * [`Phase::Ready`] – a consumer is installed; the queue was flushed into it
//!   exactly once and later submissions are delivered synchronously.
//!
//! [`FragmentRegistry`] is the single-owner core. [`SharedRegistry`] wraps it
//! for hosts that hand producer handles to several owners, and [`channel`]
//! offers the same ordering guarantee for hosts that poll instead of taking
//! callbacks.

pub mod channel;
mod config;
mod consumer;
mod error;
mod registry;
mod shared;

pub use channel::{FragmentReceiver, FragmentSender};
pub use config::{DuplicatePolicy, RegistryBuilder, RegistryConfig};
pub use consumer::{BoxedConsumer, Collector, FragmentConsumer};
pub use error::{RegistryError, RegistryResult};
pub use registry::{FragmentRegistry, Phase, RegistryStats, SubmitOutcome};
pub use shared::{RegistryProducer, SharedRegistry};

pub use fragment::{Fragment, FragmentBatch, GroupName};
