// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn package_args(help: &'static str) -> Arg {
    Arg::new("packages").num_args(0..).value_name("PACKAGE").help(help)
}

fn change_args(cmd: Command) -> Command {
    cmd.arg(package_args("Packages (name or name-version)"))
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .action(ArgAction::SetTrue)
                .help("Force operation (overwrite files etc.)"),
        )
        .arg(
            Arg::new("downloadonly")
                .short('w')
                .long("downloadonly")
                .action(ArgAction::SetTrue)
                .help("Only download packages, don't install or update anything"),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .action(ArgAction::SetTrue)
                .help("Automatically answer yes to all questions"),
        )
        .arg(
            Arg::new("no")
                .short('n')
                .long("no")
                .action(ArgAction::SetTrue)
                .help("Automatically answer no to all questions"),
        )
        .arg(
            Arg::new("if_installed")
                .long("if-installed")
                .value_name("PACKAGES")
                .help("Only run if all of these comma-separated packages are installed"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .action(ArgAction::SetTrue)
                .help("Don't connect to online repositories"),
        )
        .arg(
            Arg::new("unverified_ssl")
                .long("unverified-ssl")
                .action(ArgAction::SetTrue)
                .help("Don't verify SSL certificate validity"),
        )
}

fn build_cli() -> Command {
    Command::new("atxpkg")
        .version(env!("CARGO_PKG_VERSION"))
        .author("atxpkg Contributors")
        .about("Package manager for versioned archive bundles")
        .subcommand_required(true)
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .env("ATXPKG_ROOT")
                .help("Directory holding the ledger, repository list, cache and scratch space"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("DIR")
                .env("ATXPKG_PREFIX")
                .help("Directory packages are installed into"),
        )
        .arg(
            Arg::new("merge_tool")
                .long("merge-tool")
                .value_name("COMMAND")
                .env("ATXPKG_MERGE_TOOL")
                .default_value("vim -d")
                .help("Command used to merge configuration files"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(change_args(Command::new("install").about("Install packages")))
        .subcommand(change_args(
            Command::new("update")
                .about("Update packages (all installed packages if none are given; old..new renames)"),
        ))
        .subcommand(change_args(Command::new("remove").about("Remove packages")))
        .subcommand(
            Command::new("check")
                .about("Check installed files against the ledger")
                .arg(package_args("Packages (all installed packages if none are given)")),
        )
        .subcommand(
            Command::new("merge_config")
                .about("Merge leftover .save/.new/.backup files of preserved files")
                .arg(package_args("Packages (all installed packages if none are given)")),
        )
        .subcommand(
            Command::new("list_available")
                .about("List available packages, or the available versions of the given ones")
                .arg(package_args("Packages"))
                .arg(
                    Arg::new("offline")
                        .long("offline")
                        .action(ArgAction::SetTrue)
                        .help("Don't connect to online repositories"),
                ),
        )
        .subcommand(Command::new("list_installed").about("List installed packages"))
        .subcommand(
            Command::new("show_untracked")
                .about("Show files no installed package tracks")
                .arg(
                    Arg::new("paths")
                        .num_args(0..)
                        .value_name("PATH")
                        .help("Paths relative to the prefix"),
                ),
        )
        .subcommand(Command::new("clean_cache").about("Delete all downloaded archives"))
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to render man page");

    let man_path = man_dir.join("atxpkg.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
