//! Command-line utility for emitting, inspecting and replaying fragment
//! scripts.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fragment::{Fragment, FragmentBatch};
use fragment_codec::{
    emit_script, implementor_script_path, parse_script, PendingMode, ScriptConfig,
    DEFAULT_BINDING, DEFAULT_PENDING_VAR, DEFAULT_REGISTER_FN,
};
use registry::{Collector, DuplicatePolicy, FragmentRegistry, RegistryStats};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Text rendering helpers used by the CLI commands.
mod render {
    use fragment::{Fragment, FragmentBatch};
    use registry::RegistryStats;
    use std::fmt::Write;
    use std::path::Path;

    fn entries(count: usize) -> &'static str {
        if count == 1 {
            "entry"
        } else {
            "entries"
        }
    }

    /// Line printed for every script written by `emit`.
    pub fn wrote(path: &Path, batch: &FragmentBatch) -> String {
        format!(
            "wrote {} ({} group(s), {} {})\n",
            path.display(),
            batch.len(),
            batch.entry_count(),
            entries(batch.entry_count())
        )
    }

    /// Group summary for one parsed script.
    pub fn inspect(path: &Path, batch: &FragmentBatch) -> String {
        let mut out = String::new();
        writeln!(out, "{}: {} group(s)", path.display(), batch.len()).expect("write header");
        for fragment in batch {
            writeln!(
                out,
                "  {}: {} {}",
                fragment.group(),
                fragment.len(),
                entries(fragment.len())
            )
            .expect("write group");
        }
        out
    }

    /// Delivery sequence observed by the replay consumer.
    pub fn replay(delivered: &[Fragment], stats: RegistryStats) -> String {
        let mut out = String::new();
        writeln!(out, "delivered {} fragment(s):", delivered.len()).expect("write header");
        for (idx, fragment) in delivered.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} ({} {})",
                idx + 1,
                fragment.group(),
                fragment.len(),
                entries(fragment.len())
            )
            .expect("write fragment");
        }
        writeln!(
            out,
            "stats: queued={} delivered={} coalesced={} rejected={}",
            stats.queued, stats.delivered, stats.coalesced, stats.rejected
        )
        .expect("write stats");
        out
    }
}

/// Emit, inspect and replay documentation fragment scripts.
#[derive(Parser, Debug)]
#[command(author, version, about = "Work with implementor fragment scripts", long_about = None)]
struct Cli {
    #[command(flatten)]
    names: NameArgs,

    #[command(subcommand)]
    command: Command,
}

/// JavaScript names shared by every subcommand.
#[derive(Args, Debug)]
struct NameArgs {
    /// Local variable each script fills in.
    #[arg(long, global = true, default_value = DEFAULT_BINDING)]
    binding: String,
    /// Global consumer hook the scripts call.
    #[arg(long, global = true, default_value = DEFAULT_REGISTER_FN)]
    register_fn: String,
    /// Global variable holding fragments submitted before the hook exists.
    #[arg(long, global = true, default_value = DEFAULT_PENDING_VAR)]
    pending_var: String,
    /// How emitted scripts park their data before the hook exists.
    #[arg(long, global = true, value_enum, default_value_t = PendingModeArg::Queue)]
    pending_mode: PendingModeArg,
}

impl From<NameArgs> for ScriptConfig {
    fn from(args: NameArgs) -> Self {
        ScriptConfig {
            binding: args.binding,
            register_fn: args.register_fn,
            pending_var: args.pending_var,
            pending_mode: args.pending_mode.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PendingModeArg {
    /// Push onto a pending array; keeps every early script.
    Queue,
    /// Overwrite the pending variable, as the documentation tool does.
    Assign,
}

impl From<PendingModeArg> for PendingMode {
    fn from(arg: PendingModeArg) -> Self {
        match arg {
            PendingModeArg::Queue => PendingMode::Queue,
            PendingModeArg::Assign => PendingMode::Assign,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one script per trait listed in a JSON manifest.
    Emit {
        /// Manifest: `[{"trait_path": "...", "implementors": {"group": ["<html>"]}}]`.
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
        /// Documentation root the `implementors/` tree is written under.
        #[arg(long, value_name = "DIR", default_value = "doc")]
        out: PathBuf,
    },
    /// Print the groups registered by each script.
    Inspect {
        #[arg(required = true, value_name = "SCRIPT")]
        scripts: Vec<PathBuf>,
    },
    /// Feed scripts through a registry and print what the consumer receives.
    Replay {
        /// Install the consumer after this many fragments (defaults to after all).
        #[arg(long, value_name = "COUNT")]
        install_after: Option<usize>,
        /// Treatment of repeated groups.
        #[arg(long, value_enum, default_value_t = PolicyArg::Forward)]
        policy: PolicyArg,
        #[arg(required = true, value_name = "SCRIPT")]
        scripts: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Deliver every fragment as submitted.
    Forward,
    /// Append repeated groups to the queued fragment.
    Merge,
    /// Replace the queued fragment of a repeated group.
    Replace,
    /// Drop repeated groups.
    Reject,
}

impl From<PolicyArg> for DuplicatePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Forward => DuplicatePolicy::Forward,
            PolicyArg::Merge => DuplicatePolicy::Merge,
            PolicyArg::Replace => DuplicatePolicy::Replace,
            PolicyArg::Reject => DuplicatePolicy::Reject,
        }
    }
}

/// One trait's worth of implementors in an `emit` manifest.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    trait_path: String,
    implementors: FragmentBatch,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ScriptConfig::from(cli.names);
    config.validate()?;

    match cli.command {
        Command::Emit { manifest, out } => {
            for (path, batch) in emit_manifest(&manifest, &out, &config)? {
                print!("{}", render::wrote(&path, &batch));
            }
        }
        Command::Inspect { scripts } => {
            for path in &scripts {
                let batch = load_script(path, &config)?;
                print!("{}", render::inspect(path, &batch));
            }
        }
        Command::Replay {
            install_after,
            policy,
            scripts,
        } => {
            let batches = scripts
                .iter()
                .map(|path| load_script(path, &config))
                .collect::<Result<Vec<_>>>()?;
            let (delivered, stats) = replay(batches, install_after, policy.into());
            print!("{}", render::replay(&delivered, stats));
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore error if already set (e.g., during tests).
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_script(path: &Path, config: &ScriptConfig) -> Result<FragmentBatch> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read script {path:?}"))?;
    parse_script(&source, config).with_context(|| format!("failed to parse script {path:?}"))
}

/// Writes every manifest entry under `out` and returns the written paths.
fn emit_manifest(
    manifest: &Path,
    out: &Path,
    config: &ScriptConfig,
) -> Result<Vec<(PathBuf, FragmentBatch)>> {
    let raw = fs::read_to_string(manifest)
        .with_context(|| format!("failed to read manifest {manifest:?}"))?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse manifest {manifest:?}"))?;

    let mut written = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = out.join(
            implementor_script_path(&entry.trait_path)
                .with_context(|| format!("bad trait path in {manifest:?}"))?,
        );
        let script = emit_script(&entry.implementors, config)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {parent:?}"))?;
        }
        fs::write(&path, script).with_context(|| format!("failed to write {path:?}"))?;
        debug!(path = %path.display(), trait_path = %entry.trait_path, "wrote fragment script");
        written.push((path, entry.implementors));
    }

    info!(scripts = written.len(), "emitted manifest");
    Ok(written)
}

/// Submits every fragment, in script order, to a collecting registry whose
/// consumer is installed after `install_after` submissions.
fn replay(
    batches: Vec<FragmentBatch>,
    install_after: Option<usize>,
    policy: DuplicatePolicy,
) -> (Vec<Fragment>, RegistryStats) {
    let mut registry = FragmentRegistry::builder()
        .duplicate_policy(policy)
        .build::<Collector>();
    let install_after = install_after.unwrap_or(usize::MAX);

    let fragments = batches.into_iter().flatten();
    for (submitted, fragment) in fragments.enumerate() {
        if submitted == install_after {
            install(&mut registry);
        }
        registry.submit(fragment);
    }
    if !registry.is_ready() {
        install(&mut registry);
    }

    let stats = registry.stats();
    let delivered = registry
        .into_consumer()
        .map(Collector::into_fragments)
        .unwrap_or_default();
    (delivered, stats)
}

fn install(registry: &mut FragmentRegistry<Collector>) {
    if let Ok(drained) = registry.install_consumer(Collector::new()) {
        debug!(drained, "replay consumer installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn fragment(group: &str, entries: &[&str]) -> Fragment {
        Fragment::try_new(group, entries.iter().copied()).expect("fragment")
    }

    fn sample_batch() -> FragmentBatch {
        [
            fragment("rsx_dom", &["<impl A>"]),
            fragment("rsx_tree", &["<impl B>", "<impl C>"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn inspect_render_matches_expectation() {
        let output = render::inspect(Path::new("trait.TDOMTree.js"), &sample_batch());
        assert_snapshot!(output.trim_end(), @r"
trait.TDOMTree.js: 2 group(s)
  rsx_dom: 1 entry
  rsx_tree: 2 entries");
    }

    #[test]
    fn replay_render_matches_expectation() {
        let (delivered, stats) = replay(vec![sample_batch()], Some(1), DuplicatePolicy::Forward);
        let output = render::replay(&delivered, stats);
        assert_snapshot!(output.trim_end(), @r"
delivered 2 fragment(s):
  1. rsx_dom (1 entry)
  2. rsx_tree (2 entries)
stats: queued=1 delivered=2 coalesced=0 rejected=0");
    }

    #[test]
    fn replay_applies_duplicate_policy_across_scripts() {
        let first = FragmentBatch::from(fragment("rsx_dom", &["<a>"]));
        let second = FragmentBatch::from(fragment("rsx_dom", &["<b>"]));

        let scripts = vec![first.clone(), second.clone()];
        let (delivered, stats) = replay(scripts, None, DuplicatePolicy::Merge);
        assert_eq!(delivered, [fragment("rsx_dom", &["<a>", "<b>"])]);
        assert_eq!(stats.coalesced, 1);

        let (delivered, stats) = replay(vec![first, second], Some(0), DuplicatePolicy::Reject);
        assert_eq!(delivered, [fragment("rsx_dom", &["<a>"])]);
        assert_eq!(stats.rejected, 1);
    }

    #[test]
    fn emit_writes_conventional_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = dir.path().join("manifest.json");
        fs::write(
            &manifest,
            r#"[{"trait_path": "rsx_shared::traits::dom_traits::TDOMTree",
                "implementors": {"rsx_dom": ["<impl A>"], "rsx_tree": ["<impl B>"]}}]"#,
        )
        .expect("write manifest");

        let out = dir.path().join("doc");
        let config = ScriptConfig::default();
        let written = emit_manifest(&manifest, &out, &config).expect("emit");

        let expected = out.join("implementors/rsx_shared/traits/dom_traits/trait.TDOMTree.js");
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, expected);

        let batch = load_script(&expected, &config).expect("reload");
        assert_eq!(batch, written[0].1);
        let groups: Vec<_> = batch.groups().map(|g| g.as_str()).collect();
        assert_eq!(groups, ["rsx_dom", "rsx_tree"]);
    }

    #[test]
    fn pending_mode_flag_selects_script_tail() {
        let cli = Cli::try_parse_from(["fragment-cli", "inspect", "a.js"]).expect("parse");
        assert_eq!(ScriptConfig::from(cli.names), ScriptConfig::default());

        let args = ["fragment-cli", "inspect", "--pending-mode", "assign", "a.js"];
        let cli = Cli::try_parse_from(args).expect("parse");
        assert_eq!(ScriptConfig::from(cli.names), ScriptConfig::legacy());
    }

    #[test]
    fn emit_rejects_bad_trait_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = dir.path().join("manifest.json");
        fs::write(&manifest, r#"[{"trait_path": "NoModule", "implementors": {}}]"#)
            .expect("write manifest");

        let err = emit_manifest(&manifest, dir.path(), &ScriptConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid trait path `NoModule`"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
