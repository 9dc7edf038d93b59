use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;

use avconf_merge::{MapChange, MapDiff, MergeOutcome};
use avconf_server::{AvconfServer, ServerConfig};
use avconf_store::{ConfigCodec, Session, YamlCodec};
use avconf_types::ConfigMap;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli { command, format, config, master, .. } = cli;
    let config = load_config(config.as_deref(), master)?;
    match command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::Scan(args) => cmd_scan(&config, args, &format),
        Command::Show(args) => cmd_show(&config, args, &format),
        Command::Merge(args) => cmd_merge(&config, args, &format),
        Command::Master(_) => cmd_master(&config, &format),
        Command::Diff(args) => cmd_diff(&config, args, &format),
    }
}

/// Config file (or defaults), then the `--master` override.
fn load_config(path: Option<&Path>, master: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(master) = master {
        config.store.master_path = master;
    }
    Ok(config)
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }
    if args.root.is_some() {
        config.store.root = args.root;
    }
    println!("avconf server on {} (master: {})", config.bind_addr.to_string().bold(), config.store.master_path.display());
    let server = AvconfServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_scan(config: &ServerConfig, args: ScanArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let session = session_with_root(config, args.root.as_deref())?;
    let files = session.scan()?;
    if let OutputFormat::Json = format {
        return print_json(&files);
    }
    if files.is_empty() {
        println!("No fragment files under {}.", session.fragments_dir()?.display());
        return Ok(());
    }
    for file in &files {
        println!("  {:<48} {:>8} B", file.relative_path, file.size);
    }
    println!("{} fragment file(s)", files.len().to_string().bold());
    Ok(())
}

fn cmd_show(config: &ServerConfig, args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let fragment = Session::new(config.store.clone()).load_fragment(&args.file)?;
    print_map(&fragment.content, format)
}

fn cmd_master(config: &ServerConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let session = Session::new(config.store.clone());
    let master = session.load_master()?;
    if let OutputFormat::Text = format {
        println!("# {}", session.master_store().location().dimmed());
    }
    print_map(&master, format)
}

fn cmd_merge(config: &ServerConfig, args: MergeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let session = Session::new(config.store.clone());
    let preview = session.merge_preview(&args.files)?;

    match format {
        OutputFormat::Json => print_json(&preview)?,
        OutputFormat::Text => {
            print_conflicts(&preview.outcome);
            print_changes(&preview.changes);
            if !args.save {
                println!();
                print_map(&preview.outcome.merged, format)?;
            }
        }
    }

    if args.save {
        check_save_allowed(&preview.outcome, args.yes)?;
        session.save_master(&preview.outcome.merged)?;
        println!("{} Saved to {}", "✓".green().bold(), session.master_store().location());
    }
    Ok(())
}

fn cmd_diff(config: &ServerConfig, args: DiffArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let preview = Session::new(config.store.clone()).merge_preview(&args.files)?;
    match format {
        OutputFormat::Json => print_json(&preview.changes),
        OutputFormat::Text => {
            print_changes(&preview.changes);
            Ok(())
        }
    }
}

/// A session whose root comes from `--root`, falling back to the config file.
fn session_with_root(config: &ServerConfig, root: Option<&Path>) -> anyhow::Result<Session> {
    let Some(root) = root.or(config.store.root.as_deref()) else {
        bail!("no root directory: pass --root or set store.root in the config file");
    };
    let mut session = Session::new(config.store.clone());
    session.set_root(root)?;
    Ok(session)
}

/// Conflicts gate persistence until the user confirms.
fn check_save_allowed(outcome: &MergeOutcome, confirmed: bool) -> anyhow::Result<()> {
    if outcome.has_conflicts() && !confirmed {
        bail!(
            "{} conflict(s) would overwrite existing values; re-run with --yes to save anyway",
            outcome.conflicts.len()
        );
    }
    Ok(())
}

fn print_conflicts(outcome: &MergeOutcome) {
    if !outcome.has_conflicts() {
        println!("{} No conflicts.", "✓".green());
        return;
    }
    println!("{} {} conflict(s):", "!".yellow().bold(), outcome.conflicts.len());
    for conflict in &outcome.conflicts {
        println!(
            "  {}  {} → {}",
            conflict.to_string().yellow(),
            conflict.existing.to_string().dimmed(),
            conflict.incoming
        );
    }
}

fn print_changes(diff: &MapDiff) {
    if diff.is_empty() {
        println!("No changes.");
        return;
    }
    for change in &diff.changes {
        match change {
            MapChange::Added { path, value } => println!("  {} {path} = {value}", "+".green()),
            MapChange::Removed { path, value } => println!("  {} {path} = {value}", "-".red()),
            MapChange::Modified { path, old, new } => {
                println!("  {} {path}: {} → {new}", "~".yellow(), old.to_string().dimmed())
            }
        }
    }
    println!(
        "{} added, {} removed, {} modified",
        diff.additions().to_string().green(),
        diff.removals().to_string().red(),
        diff.modifications().to_string().yellow()
    );
}

fn print_map(map: &ConfigMap, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(map),
        OutputFormat::Text => {
            let bytes = YamlCodec.encode(map)?;
            print!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
