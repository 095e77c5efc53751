//! Self-registering fragment scripts.
//!
//! Every documented trait gets one script which, when loaded, hands its
//! [`FragmentBatch`] to the page consumer if one is installed and otherwise
//! queues it in a well-known pending variable:
//!
//! ```text
//! (function() {var implementors = {};
//! implementors["rsx_dom"] = ["<html>",];
//!
//! if (window.register_implementors) {
//!     window.register_implementors(implementors);
//! } else {
//!     (window.pending_implementors = window.pending_implementors || []).push(implementors);
//! }
//!
//! })()
//! ```
//!
//! [`PendingMode::Assign`] writes the documentation tool's original form,
//! `window.pending_implementors = implementors;`, instead. The tail is
//! indented as the documentation tool indents it; the sketch above is not.
//!
//! [`emit_script`] writes that shape, [`parse_script`] reads it back, and
//! [`implementor_script_path`] gives the conventional location of a trait's
//! script inside the documentation output.

mod config;
mod emit;
mod error;
mod parse;
mod path;

pub use config::{
    PendingMode, ScriptConfig, DEFAULT_BINDING, DEFAULT_PENDING_VAR, DEFAULT_REGISTER_FN,
};
pub use emit::emit_script;
pub use error::{CodecError, CodecResult};
pub use parse::parse_script;
pub use path::{implementor_script_path, IMPLEMENTORS_DIR};

pub use fragment::FragmentBatch;
