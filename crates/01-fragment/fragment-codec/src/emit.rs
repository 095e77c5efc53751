use std::fmt::Write;

use fragment::FragmentBatch;
use tracing::debug;

use crate::config::{PendingMode, ScriptConfig};
use crate::error::CodecResult;

/// Indentation of the registration tail, as the documentation tool writes it.
const TAIL_INDENT: &str = "            ";
const TAIL_TRAILER: &str = "        ";

/// Renders the self-registering script for `batch`.
///
/// One assignment line per group, in batch order. Every entry is a JSON
/// string literal followed by a comma, trailing comma included. The fallback
/// branch follows [`ScriptConfig::pending_mode`].
pub fn emit_script(batch: &FragmentBatch, config: &ScriptConfig) -> CodecResult<String> {
    config.validate()?;
    let ScriptConfig {
        binding,
        register_fn,
        pending_var,
        pending_mode,
    } = config;

    let mut out = String::with_capacity(256 + batch.entry_count() * 128);
    writeln!(out, "(function() {{var {binding} = {{}};").expect("write to string");

    for fragment in batch {
        let group = serde_json::to_string(fragment.group().as_str())?;
        write!(out, "{binding}[{group}] = [").expect("write to string");
        for entry in fragment.entries() {
            out.push_str(&serde_json::to_string(entry)?);
            out.push(',');
        }
        out.push_str("];\n");
    }

    let park = match pending_mode {
        PendingMode::Queue => format!(
            "(window.{pending_var} = window.{pending_var} || []).push({binding});"
        ),
        PendingMode::Assign => format!("window.{pending_var} = {binding};"),
    };
    write!(
        out,
        "\n{indent}if (window.{register_fn}) {{\n\
         {indent}    window.{register_fn}({binding});\n\
         {indent}}} else {{\n\
         {indent}    {park}\n\
         {indent}}}\n\
         {trailer}\n\
         }})()\n",
        indent = TAIL_INDENT,
        trailer = TAIL_TRAILER,
    )
    .expect("write to string");

    debug!(
        groups = batch.len(),
        entries = batch.entry_count(),
        bytes = out.len(),
        "emitted fragment script"
    );
    Ok(out)
}
