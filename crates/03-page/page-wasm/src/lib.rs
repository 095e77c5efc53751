//! Page-side consumer hook for fragment scripts.
//!
//! Fragment scripts call `window.register_implementors(map)` when the hook
//! exists and otherwise push their map onto `window.pending_implementors`
//! (older scripts overwrite it with a single map instead). On wasm32,
//! `installPageConsumer` is the page's initialisation step: it picks up
//! whatever is pending, flushes it through a [`registry::FragmentRegistry`]
//! into the page's render callback, then defines the hook so later scripts
//! deliver straight through.
//!
//! The conversion rules ([`decode_map`]) and the reentrancy-safe holder
//! ([`PageSlot`]) are plain Rust and build on every target.

mod decode;
mod slot;

pub use decode::{decode_map, RawEntries, Skip};
pub use slot::PageSlot;

#[cfg(target_arch = "wasm32")]
mod bridge;

#[cfg(target_arch = "wasm32")]
pub use bridge::install_page_consumer;

// Browser tests driven through wasm-bindgen entry points.
#[cfg(target_arch = "wasm32")]
pub mod tests;
