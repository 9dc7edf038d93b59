use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "avconf",
    about = "Merge YAML configuration fragments into a master configuration",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Master configuration file (overrides the config file)
    #[arg(long, global = true)]
    pub master: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// List fragment files under a root
    Scan(ScanArgs),
    /// Decode and print one fragment
    Show(ShowArgs),
    /// Merge fragments into the master configuration
    Merge(MergeArgs),
    /// Print the master configuration
    Master(MasterArgs),
    /// Show what merging fragments would change in the master
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<String>,
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct ScanArgs {
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct MergeArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Write the merged result to the master configuration
    #[arg(long)]
    pub save: bool,
    /// Save even when conflicts were found
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct MasterArgs {}

#[derive(Args)]
pub struct DiffArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["avconf", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".into()));
            assert!(args.root.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_scan_root() {
        let cli = Cli::try_parse_from(["avconf", "scan", "--root", "/ws"]).unwrap();
        if let Command::Scan(args) = cli.command {
            assert_eq!(args.root, Some(PathBuf::from("/ws")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_save_yes() {
        let cli = Cli::try_parse_from(["avconf", "merge", "a.yaml", "b.yaml", "--save", "-y"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.files, vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
            assert!(args.save);
            assert!(args.yes);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn merge_requires_files() {
        assert!(Cli::try_parse_from(["avconf", "merge"]).is_err());
        assert!(Cli::try_parse_from(["avconf", "diff"]).is_err());
    }

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["avconf", "show", "x.yaml"]).unwrap();
        assert!(matches!(cli.command, Command::Show(_)));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "avconf", "--verbose", "--format", "json", "--master", "/tmp/m.yaml", "master",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.master, Some(PathBuf::from("/tmp/m.yaml")));
        assert!(matches!(cli.command, Command::Master(_)));
    }

    #[test]
    fn parse_config_after_subcommand() {
        let cli = Cli::try_parse_from(["avconf", "scan", "--config", "avconf.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("avconf.toml")));
    }
}
