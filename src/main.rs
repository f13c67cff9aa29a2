// src/main.rs

use anyhow::{Result, bail};
use atxpkg::commands::{self, Options, Session};
use atxpkg::config::{Config, DEFAULT_PREFIX, DEFAULT_ROOT};
use atxpkg::operator::{DEFAULT_MERGE_TOOL, TerminalOperator};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "atxpkg")]
#[command(author, version, about = "Package manager for versioned archive bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the ledger, repository list, cache and scratch space
    #[arg(long, global = true, env = "ATXPKG_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Directory packages are installed into
    #[arg(long, global = true, env = "ATXPKG_PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: PathBuf,

    /// Command used to merge configuration files
    #[arg(long, global = true, env = "ATXPKG_MERGE_TOOL", default_value = DEFAULT_MERGE_TOOL)]
    merge_tool: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install packages
    Install(ChangeArgs),
    /// Update packages (all installed packages if none are given; `old..new` renames)
    Update(ChangeArgs),
    /// Remove packages
    Remove(ChangeArgs),
    /// Check installed files against the ledger
    Check {
        /// Packages (all installed packages if none are given)
        packages: Vec<String>,
    },
    /// Merge leftover .save/.new/.backup files of preserved files
    #[command(name = "merge_config")]
    MergeConfig {
        /// Packages (all installed packages if none are given)
        packages: Vec<String>,
    },
    /// List available packages, or the available versions of the given ones
    #[command(name = "list_available")]
    ListAvailable {
        /// Packages
        packages: Vec<String>,
        #[command(flatten)]
        network: NetworkArgs,
    },
    /// List installed packages
    #[command(name = "list_installed")]
    ListInstalled,
    /// Show files no installed package tracks
    #[command(name = "show_untracked")]
    ShowUntracked {
        /// Paths relative to the prefix (tracked top-level directories if none are given)
        paths: Vec<String>,
    },
    /// Delete all downloaded archives
    #[command(name = "clean_cache")]
    CleanCache,
}

#[derive(Args)]
struct ChangeArgs {
    /// Packages (`name`, `name-version`)
    packages: Vec<String>,

    /// Force operation (overwrite files etc.)
    #[arg(short, long)]
    force: bool,

    /// Only download packages, don't install or update anything
    #[arg(short = 'w', long)]
    downloadonly: bool,

    /// Automatically answer yes to all questions
    #[arg(short, long, conflicts_with = "no")]
    yes: bool,

    /// Automatically answer no to all questions
    #[arg(short, long)]
    no: bool,

    /// Only run if all of these comma-separated packages are installed
    #[arg(long, value_delimiter = ',')]
    if_installed: Vec<String>,

    #[command(flatten)]
    network: NetworkArgs,
}

#[derive(Args)]
struct NetworkArgs {
    /// Don't connect to online repositories
    #[arg(long)]
    offline: bool,

    /// Don't verify SSL certificate validity
    #[arg(long)]
    unverified_ssl: bool,
}

impl ChangeArgs {
    fn options(&self) -> Options {
        Options {
            force: self.force,
            download_only: self.downloadonly,
            yes: self.yes,
            no: self.no,
            offline: self.network.offline,
            unverified_ssl: self.network.unverified_ssl,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting atxpkg v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::new(&cli.root, &cli.prefix).with_merge_tool(&cli.merge_tool);
    debug!("Configuration: {:?}", config);
    config.ensure_dirs()?;

    let operator = TerminalOperator::new(&config.merge_tool);

    match cli.command {
        Commands::Install(args) => {
            let mut session = Session::open(config, args.options(), &operator)?;
            commands::if_installed(&session.ledger, &args.if_installed)?;
            if commands::install_packages(&mut session, &args.packages)? {
                println!("install completed");
            }
        }
        Commands::Update(args) => {
            let mut session = Session::open(config, args.options(), &operator)?;
            commands::if_installed(&session.ledger, &args.if_installed)?;
            if commands::update_packages(&mut session, &args.packages)? {
                println!("update completed");
            }
        }
        Commands::Remove(args) => {
            if args.packages.is_empty() {
                bail!("No packages to remove");
            }
            let mut session = Session::open(config, args.options(), &operator)?;
            commands::if_installed(&session.ledger, &args.if_installed)?;
            if commands::remove_packages(&mut session, &args.packages)? {
                println!("remove completed");
            }
        }
        Commands::Check { packages } => {
            let session = Session::open(config, Options::default(), &operator)?;
            let problems = commands::check_packages(&session, &packages)?;
            if problems > 0 {
                bail!("error count: {}", problems);
            }
        }
        Commands::MergeConfig { packages } => {
            let session = Session::open(config, Options::default(), &operator)?;
            let merged = commands::merge_config(&session, &packages)?;
            info!("Merged {} files", merged);
        }
        Commands::ListAvailable { packages, network } => {
            let options = Options {
                offline: network.offline,
                unverified_ssl: network.unverified_ssl,
                ..Options::default()
            };
            let session = Session::open(config, options, &operator)?;
            for (name, version) in commands::list_available(&session, &packages)? {
                match version {
                    Some(version) => println!("{}-{}", name, version),
                    None => println!("{}", name),
                }
            }
        }
        Commands::ListInstalled => {
            let session = Session::open(config, Options::default(), &operator)?;
            for (name, version, installed_at) in commands::list_installed(&session.ledger) {
                match installed_at {
                    Some(date) => println!("{}-{} ({})", name, version, date.format("%Y-%m-%d %H:%M")),
                    None => println!("{}-{}", name, version),
                }
            }
        }
        Commands::ShowUntracked { paths } => {
            let session = Session::open(config, Options::default(), &operator)?;
            for path in commands::show_untracked(&session, &paths)? {
                println!("{}", path);
            }
        }
        Commands::CleanCache => {
            let session = Session::open(config, Options::default(), &operator)?;
            for path in commands::clean_cache(&session)? {
                eprintln!("D {}", path);
            }
        }
    }

    Ok(())
}
