//! Documentation fragment data model.
//!
//! A documentation tool emits one script per documented trait. Each script
//! carries a [`FragmentBatch`]: the implementors of that trait grouped by the
//! crate providing them, as pre-rendered HTML strings. This crate defines the
//! shared types that producers, the registry, and the script codec compile
//! against:
//! * [`GroupName`] – non-empty name of the implementing crate.
//! * [`Fragment`] – one group plus its ordered HTML entries.
//! * [`FragmentBatch`] – the ordered fragments carried by one script.

mod batch;
mod error;
mod fragment;
mod group;

pub use batch::FragmentBatch;
pub use error::{FragmentError, FragmentResult};
pub use fragment::Fragment;
pub use group::GroupName;
