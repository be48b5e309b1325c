mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::ConfigMerger;
use diffy::PatchFormatter;
use esedit_core::{EditError, FsTree, Tree};
use esedit_flat_config::{FlatConfigEditor, Mapping, PropertyValue};
use esedit_imports::{ImportKind, ImportsEditor};
use esedit_syntax::Document;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "esedit",
    version,
    about = "Structure-preserving edits for ESLint flat configs and import sections."
)]
struct Cli {
    /// Repository root (default: current directory).
    #[arg(long, global = true, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Write changes to disk. If omitted, prints a unified diff instead.
    #[arg(long, global = true, default_value_t = false)]
    write: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect and rearrange flat config entries.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Edit the rules of one flat config entry.
    #[command(subcommand)]
    Rule(RuleCommand),
    /// Add or remove `...expr` spreads.
    #[command(subcommand)]
    Spread(SpreadCommand),
    /// Ensure, remove and query import specifiers of a module.
    #[command(subcommand)]
    Import(ImportCommand),
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print every entry as JSON.
    List(ConfigFileArgs),
    /// Remove the entry for a file pattern set.
    Remove(EntryArgs),
    /// Copy an entry's fields onto another pattern set.
    Copy(FromToArgs),
    /// Copy an entry's rules onto another pattern set.
    MergeRules(FromToArgs),
    /// Set `languageOptions.parser` and `languageOptions.parserOptions`.
    LanguageOptions(LanguageOptionsArgs),
}

#[derive(Debug, Subcommand)]
enum RuleCommand {
    /// Append a rule without checking for duplicates.
    Add(RuleValueArgs),
    /// Replace a rule's value in place, appending it when absent.
    Update(RuleValueArgs),
    /// Set a rule unless it already has the given value.
    Ensure(RuleValueArgs),
    Remove(RuleNameArgs),
}

#[derive(Debug, Subcommand)]
enum SpreadCommand {
    Add(SpreadArgs),
    Remove(SpreadArgs),
}

#[derive(Debug, Subcommand)]
enum ImportCommand {
    /// Make the module bind a name.
    Ensure(ImportArgs),
    /// Remove a binding, deleting the declaration once it is empty.
    Remove(ImportArgs),
    /// Print `true` or `false`.
    Has(ImportArgs),
    /// Print every import declaration as JSON.
    List(ImportFileArgs),
    /// Ensure the bindings of one import statement given as text.
    Statement(StatementArgs),
}

#[derive(Debug, Args)]
struct ConfigFileArgs {
    /// Flat config module (default: esedit.toml `eslint.path`, else eslint.config.mjs).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Args)]
struct EntryArgs {
    #[command(flatten)]
    file: ConfigFileArgs,

    /// File patterns identifying the entry. Order does not matter.
    #[arg(long, value_name = "GLOB", num_args = 0..)]
    files: Vec<String>,
}

#[derive(Debug, Args)]
struct FromToArgs {
    #[command(flatten)]
    file: ConfigFileArgs,

    #[arg(long, value_name = "GLOB", num_args = 0..)]
    from: Vec<String>,

    #[arg(long, value_name = "GLOB", num_args = 0..)]
    to: Vec<String>,
}

#[derive(Debug, Args)]
struct LanguageOptionsArgs {
    #[command(flatten)]
    entry: EntryArgs,

    /// Parser as a JavaScript expression, e.g. `tsParser` or `'espree'`.
    #[arg(long)]
    parser: Option<String>,

    /// Parser options as a JSON object.
    #[arg(long)]
    parser_options: Option<String>,
}

#[derive(Debug, Args)]
struct RuleNameArgs {
    #[command(flatten)]
    entry: EntryArgs,

    #[arg(long)]
    name: String,
}

#[derive(Debug, Args)]
struct RuleValueArgs {
    #[command(flatten)]
    rule: RuleNameArgs,

    /// Rule value as JSON, e.g. `"error"` or `["warn", {"max": 3}]`.
    #[arg(long)]
    value: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpreadTarget {
    Rules,
    Config,
}

#[derive(Debug, Args)]
struct SpreadArgs {
    #[command(flatten)]
    entry: EntryArgs,

    /// Whether the spread goes into the entry's rules or the entry itself.
    #[arg(long, value_enum, default_value = "rules")]
    target: SpreadTarget,

    /// Expression to spread, without the leading `...`.
    #[arg(long)]
    expr: String,
}

#[derive(Debug, Args)]
struct ImportFileArgs {
    /// JavaScript module to edit, relative to the repository root.
    #[arg(long)]
    file: Utf8PathBuf,
}

#[derive(Debug, Args)]
struct ImportArgs {
    #[command(flatten)]
    file: ImportFileArgs,

    #[arg(long)]
    module: String,

    /// One of named, default, namespace, full.
    #[arg(long, default_value = "named")]
    kind: ImportKind,

    /// Bound name. Not needed for `full`.
    #[arg(long, default_value = "")]
    name: String,

    /// Local alias for a named import (ensure only).
    #[arg(long)]
    alias: Option<String>,
}

#[derive(Debug, Args)]
struct StatementArgs {
    #[command(flatten)]
    file: ImportFileArgs,

    /// Statement text, e.g. `import { a } from 'm'`.
    #[arg(long)]
    text: String,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        let code = e.downcast_ref::<EditError>().map_or(1, EditError::exit_code);
        return ExitCode::from(code);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_config =
        config::load_or_default(&cli.repo_root).context("load esedit.toml config")?;
    let session = Session {
        tree: FsTree::new(cli.repo_root.clone()),
        merger: ConfigMerger::new(file_config),
        write: cli.write,
    };

    match cli.cmd {
        Command::Config(cmd) => cmd_config(&session, cmd),
        Command::Rule(cmd) => cmd_rule(&session, cmd),
        Command::Spread(cmd) => cmd_spread(&session, cmd),
        Command::Import(cmd) => cmd_import(&session, cmd),
    }
}

/// Shared state for one invocation.
struct Session {
    tree: FsTree,
    merger: ConfigMerger,
    write: bool,
}

impl Session {
    fn settings(&self, file: &ConfigFileArgs) -> config::MergedConfig {
        self.merger.merge_args(file.config.as_deref(), self.write)
    }

    fn config_editor(&self, file: &ConfigFileArgs) -> anyhow::Result<FlatConfigEditor<'_>> {
        let path = self.settings(file).eslint_config;
        Ok(FlatConfigEditor::open(&self.tree, path)?)
    }

    fn imports_editor(&self, file: &ImportFileArgs) -> anyhow::Result<ImportsEditor<'_>> {
        Ok(ImportsEditor::open(&self.tree, file.file.clone())?)
    }

    /// Writes `after` when writing is enabled, otherwise prints the diff.
    fn finish(&self, path: &Utf8Path, after: &str) -> anyhow::Result<()> {
        let before = self
            .tree
            .read(path)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        if before == after {
            info!("{} is already up to date", path);
            return Ok(());
        }
        if self.merger.merge_args(None, self.write).write {
            self.tree.write(path, after.as_bytes())?;
            info!("wrote {}", path);
        } else {
            print!("{}", render_diff(path, &before, after));
        }
        Ok(())
    }
}

fn cmd_config(session: &Session, cmd: ConfigCommand) -> anyhow::Result<()> {
    let file = match &cmd {
        ConfigCommand::List(file) => file,
        ConfigCommand::Remove(entry) => &entry.file,
        ConfigCommand::Copy(args) | ConfigCommand::MergeRules(args) => &args.file,
        ConfigCommand::LanguageOptions(args) => &args.entry.file,
    };
    let mut editor = session.config_editor(file)?;

    match &cmd {
        ConfigCommand::List(_) => {
            let configs = editor.configs();
            println!("{}", serde_json::to_string_pretty(&configs)?);
            return Ok(());
        }
        ConfigCommand::Remove(entry) => {
            if !editor.remove_config(entry.files.as_slice()) {
                info!(files = ?entry.files, "no matching config entry");
            }
        }
        ConfigCommand::Copy(args) => {
            if !editor.copy_config_to_pattern(args.from.as_slice(), args.to.as_slice()) {
                info!(from = ?args.from, "no config entry to copy");
            }
        }
        ConfigCommand::MergeRules(args) => {
            if !editor.merge_rules_from_pattern(args.from.as_slice(), args.to.as_slice()) {
                info!(from = ?args.from, "no rules to merge");
            }
        }
        ConfigCommand::LanguageOptions(args) => {
            let parser = args.parser.as_deref().map(expression_value);
            let parser_options = args
                .parser_options
                .as_deref()
                .map(json_mapping)
                .transpose()?;
            editor.set_language_options(args.entry.files.as_slice(), parser, parser_options);
        }
    }

    session.finish(editor.path(), &editor.content())
}

fn cmd_rule(session: &Session, cmd: RuleCommand) -> anyhow::Result<()> {
    let entry = match &cmd {
        RuleCommand::Add(args) | RuleCommand::Update(args) | RuleCommand::Ensure(args) => {
            &args.rule.entry
        }
        RuleCommand::Remove(args) => &args.entry,
    };
    let mut editor = session.config_editor(&entry.file)?;
    let files = entry.files.as_slice();

    match &cmd {
        RuleCommand::Add(args) => {
            editor.add_rule(files, &args.rule.name, json_value(&args.value)?);
        }
        RuleCommand::Update(args) => {
            editor.update_rule(files, &args.rule.name, json_value(&args.value)?);
        }
        RuleCommand::Ensure(args) => {
            editor.ensure_rule(files, &args.rule.name, json_value(&args.value)?);
        }
        RuleCommand::Remove(args) => {
            if !editor.remove_rule(files, &args.name) {
                info!(rule = %args.name, "rule not present");
            }
        }
    }

    session.finish(editor.path(), &editor.content())
}

fn cmd_spread(session: &Session, cmd: SpreadCommand) -> anyhow::Result<()> {
    let (args, add) = match &cmd {
        SpreadCommand::Add(args) => (args, true),
        SpreadCommand::Remove(args) => (args, false),
    };
    let mut editor = session.config_editor(&args.entry.file)?;
    let files = args.entry.files.as_slice();

    let found = match (args.target, add) {
        (SpreadTarget::Rules, true) => {
            editor.add_spread_to_rules(files, &args.expr).map(|_| true)
        }
        (SpreadTarget::Rules, false) => editor.remove_spread_from_rules(files, &args.expr),
        (SpreadTarget::Config, true) => {
            editor.add_spread_to_config(files, &args.expr).map(|_| true)
        }
        (SpreadTarget::Config, false) => editor.remove_spread_from_config(files, &args.expr),
    }?;
    if !found {
        info!(expr = %args.expr, "spread not present");
    }

    session.finish(editor.path(), &editor.content())
}

fn cmd_import(session: &Session, cmd: ImportCommand) -> anyhow::Result<()> {
    let file = match &cmd {
        ImportCommand::Ensure(args) | ImportCommand::Remove(args) | ImportCommand::Has(args) => {
            &args.file
        }
        ImportCommand::List(file) => file,
        ImportCommand::Statement(args) => &args.file,
    };
    let mut editor = session.imports_editor(file)?;

    let changed = match &cmd {
        ImportCommand::Has(args) => {
            println!("{}", editor.has(&args.name, &args.module, args.kind));
            return Ok(());
        }
        ImportCommand::List(_) => {
            println!("{}", serde_json::to_string_pretty(&editor.list())?);
            return Ok(());
        }
        ImportCommand::Ensure(args) => {
            require_name(args)?;
            match (&args.alias, args.kind) {
                (Some(alias), ImportKind::Named) => {
                    editor.ensure_import_as(&args.name, alias, &args.module)
                }
                (Some(_), kind) => {
                    anyhow::bail!("--alias only applies to named imports, not {kind}")
                }
                (None, kind) => editor.ensure(&args.name, &args.module, kind),
            }
        }
        ImportCommand::Remove(args) => {
            require_name(args)?;
            editor.remove(&args.name, &args.module, args.kind)
        }
        ImportCommand::Statement(args) => editor.ensure_from_statement(&args.text),
    };
    debug!(changed, "import edit finished");

    session.finish(editor.path(), &editor.content())
}

fn require_name(args: &ImportArgs) -> anyhow::Result<()> {
    if args.kind != ImportKind::Full && args.name.is_empty() {
        anyhow::bail!("--name is required for {} imports", args.kind);
    }
    Ok(())
}

/// Parses a JSON command-line value.
fn json_value(text: &str) -> anyhow::Result<PropertyValue> {
    let json: serde_json::Value =
        serde_json::from_str(text).with_context(|| format!("parse JSON value `{}`", text))?;
    Ok(PropertyValue::from(json))
}

fn json_mapping(text: &str) -> anyhow::Result<Mapping> {
    match json_value(text)? {
        PropertyValue::Mapping(mapping) => Ok(mapping),
        _ => anyhow::bail!("expected a JSON object, got `{}`", text),
    }
}

/// Decodes a JavaScript expression the way it would read inside a config entry.
fn expression_value(text: &str) -> PropertyValue {
    let mut doc = Document::parse("");
    let node = doc.parse_expression(text);
    esedit_value::decode(&doc, node)
}

fn render_diff(path: &Utf8Path, before: &str, after: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    let patch = diffy::create_patch(before, after);
    out.push_str(&PatchFormatter::new().fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
