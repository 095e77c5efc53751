use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Default name of the local object a script fills in.
pub const DEFAULT_BINDING: &str = "implementors";
/// Default global consumer hook checked by every script.
pub const DEFAULT_REGISTER_FN: &str = "register_implementors";
/// Default global variable holding data submitted before the hook exists.
pub const DEFAULT_PENDING_VAR: &str = "pending_implementors";

/// How a script parks its map when the consumer hook is not defined yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingMode {
    /// Push onto an array in the pending variable, so every script loaded
    /// before the consumer is kept.
    #[default]
    Queue,
    /// Overwrite the pending variable with this script's map. Byte-compatible
    /// with the documentation tool's output, but only the last script loaded
    /// before the consumer survives.
    Assign,
}

/// JavaScript names used by a fragment script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Local variable holding the group map.
    pub binding: String,
    /// `window` property the page consumer installs.
    pub register_fn: String,
    /// `window` property used as the pending holding variable.
    pub pending_var: String,
    pub pending_mode: PendingMode,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            binding: DEFAULT_BINDING.to_string(),
            register_fn: DEFAULT_REGISTER_FN.to_string(),
            pending_var: DEFAULT_PENDING_VAR.to_string(),
            pending_mode: PendingMode::default(),
        }
    }
}

impl ScriptConfig {
    /// Configuration reproducing the documentation tool's scripts byte for
    /// byte.
    pub fn legacy() -> Self {
        Self {
            pending_mode: PendingMode::Assign,
            ..Self::default()
        }
    }

    /// Checks that every configured name is a plain JavaScript identifier.
    pub fn validate(&self) -> CodecResult<()> {
        for (field, value) in [
            ("binding", &self.binding),
            ("register_fn", &self.register_fn),
            ("pending_var", &self.pending_var),
        ] {
            if !is_identifier(value) {
                return Err(CodecError::config(format!(
                    "{field} `{value}` is not a JavaScript identifier"
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => chars.all(is_ident_continue),
        _ => false,
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
