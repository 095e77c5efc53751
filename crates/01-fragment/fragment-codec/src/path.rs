use std::path::PathBuf;

use crate::error::{CodecError, CodecResult};

/// Directory, relative to the documentation root, holding implementor scripts.
pub const IMPLEMENTORS_DIR: &str = "implementors";

/// Maps a trait path such as `rsx_shared::traits::dom_traits::TDOMTree` to
/// `implementors/rsx_shared/traits/dom_traits/trait.TDOMTree.js`.
///
/// The path needs at least a crate and a trait segment, and every segment
/// must be a Rust identifier. Raw identifiers lose their `r#` prefix.
pub fn implementor_script_path(trait_path: &str) -> CodecResult<PathBuf> {
    let invalid = || CodecError::InvalidTraitPath(trait_path.to_string());
    let segments = trait_path
        .split("::")
        .map(rust_identifier)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;
    let Some((trait_name, modules)) = segments.split_last() else {
        return Err(invalid());
    };
    if modules.is_empty() {
        return Err(invalid());
    }

    let mut path = PathBuf::from(IMPLEMENTORS_DIR);
    path.extend(modules);
    path.push(format!("trait.{trait_name}.js"));
    Ok(path)
}

/// Returns the identifier named by `segment`, without any `r#` prefix.
fn rust_identifier(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix("r#").unwrap_or(segment);
    let mut chars = name.chars();
    let first = chars.next()?;
    let valid = (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && name != "_";
    valid.then_some(name)
}
