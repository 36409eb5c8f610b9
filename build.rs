// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: output directory
fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("DIR")
        .default_value(".")
        .help("Output directory")
}

/// Common arguments: configuration file and overrides
fn config_args() -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("PATH")
            .help("Path to a TOML configuration file"),
        Arg::new("name")
            .short('n')
            .long("name")
            .help("Name of the derived library"),
        Arg::new("prefix")
            .short('p')
            .long("prefix")
            .help("Function-name prefix of the derived library"),
        Arg::new("year")
            .short('y')
            .long("year")
            .help("Copyright year substituted into the license texts"),
        Arg::new("version_tag")
            .long("version-tag")
            .help("Record \"Derived from <lib> version <v>\" at the top of every output"),
        Arg::new("per_file")
            .long("per-file")
            .action(ArgAction::SetTrue)
            .help("Write every transformed input under its renamed filename"),
    ]
}

fn build_cli() -> Command {
    Command::new("relib")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Relib Contributors")
        .about("Rewrites a C source distribution into a renamed, relicensed derived distribution")
        .subcommand_required(true)
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only log warnings and errors, and skip the leak report"),
        )
        .subcommand(
            Command::new("derive")
                .about("Derive a renamed, relicensed distribution")
                .arg(Arg::new("input").required(true).help("Distribution directory or archive"))
                .arg(output_arg())
                .args(config_args()),
        )
        .subcommand(
            Command::new("flatten")
                .about("Merge an already-derived tree into one header, source and test file")
                .arg(Arg::new("srcdir").help("Directory holding the derived tree (auto-detected when omitted)"))
                .arg(
                    Arg::new("root")
                        .long("root")
                        .default_value(".")
                        .help("Directory searched when auto-detecting the derived tree"),
                )
                .arg(output_arg())
                .args(config_args()),
        )
        .subcommand(
            Command::new("check")
                .about("Scan files for leftover provenance tokens")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .help("Files to scan"),
                )
                .args(config_args()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("relib.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
