// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.
//   * "Rust-upgrade" - place where code can be improved using a Rust feature
//       that is not implemented or stabilized yet.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_config;
mod client_main;
mod http_authority;
mod network;
mod show_main;
mod tui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command, arg, value_parser};
use client_config::ClientConfig;


fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'.", path.display()))?;
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .filter_level(log::LevelFilter::Info);
        }
        None => {
            // The terminal belongs to the UI: only problems are worth printing over it.
            builder.target(env_logger::Target::Stderr).filter_level(log::LevelFilter::Warn);
        }
    }
    builder.filter_module("reqwest", log::LevelFilter::Warn).parse_default_env().init();
    Ok(())
}

// Config file values, overridden by whatever was given on the command line.
fn resolve_config(sub_matches: &ArgMatches) -> anyhow::Result<ClientConfig> {
    let mut config = match sub_matches.get_one::<PathBuf>("config") {
        Some(path) => client_config::read_config_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(server_url) = sub_matches.get_one::<String>("server_url") {
        config.server_url = server_url.clone();
    }
    if let Ok(Some(log_file)) = sub_matches.try_get_one::<PathBuf>("log-file") {
        config.log_file = Some(log_file.clone());
    }
    Ok(config)
}

fn config_arg() -> Arg {
    arg!(-c --"config" <file> "Path to the configuration file: yaml-serialized ClientConfig.")
        .value_parser(value_parser!(PathBuf))
}

fn main() -> anyhow::Result<()> {
    let matches = Command::new("Chessboard")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Terminal chessboard for a remote chess rules server")
        .subcommand_required(true)
        .subcommand(
            Command::new("play")
                .about("Play in the terminal: starts a new game unless --resume is given")
                .arg(arg!(<server_url> "Server URL, e.g. http://localhost:8080"))
                .arg(config_arg())
                .arg(
                    arg!(--"resume" "Continue the game the server currently holds")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"log-file" <file> "Write logs to this file")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Print the current board and game status and exit")
                .arg(arg!(<server_url> "Server URL, e.g. http://localhost:8080"))
                .arg(config_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("play", sub_matches)) => {
            let config = resolve_config(sub_matches)?;
            init_logging(config.log_file.as_deref())?;
            client_main::run(config, sub_matches.get_flag("resume"))
        }
        Some(("show", sub_matches)) => {
            let config = resolve_config(sub_matches)?;
            init_logging(config.log_file.as_deref())?;
            show_main::run(config)
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
