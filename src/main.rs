//! `bsv-skills` — BSV wallet, identity and backup skills behind one CLI.
//!
//! # Overview
//!
//! Read-only chain queries go to the WhatsOnChain REST API.  Identity and
//! backup work is delegated to the external `bap` and `bbackup` CLIs, and
//! every backup file produced is recorded in a small JSON registry.
//!
//! # Usage
//!
//! ```text
//! bsv-skills price                              # BSV exchange rate
//! bsv-skills lookup <address> [mode]            # balance / history / utxos
//! bsv-skills decode <tx-hex-or-txid>            # decoded transaction JSON
//! bsv-skills identity create <name> type42      # new BAP identity backup
//! bsv-skills backup decrypt wallet.bep -        # plaintext to the console
//! bsv-skills --print-config                     # show resolved config
//! ```
//!
//! Exit status is 0 on success (placeholder skills included) and 1 on any
//! error, usage errors included.
//!
//! # Module layout
//!
//! | Module                   | Responsibility                              |
//! |--------------------------|---------------------------------------------|
//! | [`cli`]                  | Argument types parsed by clap               |
//! | [`config`]               | `Config` struct + TOML loader               |
//! | [`error`]                | `SkillError` taxonomy                       |
//! | [`api`]                  | WhatsOnChain client behind `ChainApi`       |
//! | [`registry`]             | Backup registry JSON store                  |
//! | [`runner`]               | Argument construction + captured execution  |
//! | [`tools`]                | `bap` / `bbackup` behind capability traits  |
//! | [`ui`]                   | Spinner, headings, error line               |
//! | [`commands`]             | One handler module per skill                |

mod api;
mod cli;
mod commands;
mod config;
mod error;
mod registry;
mod runner;
mod tools;
mod ui;

use std::{io::Write, process::ExitCode};

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use cli::{BackupCommand, Cli, IdentityCommand, PostsCommand, RegistryCommand, Subcommand};
use commands::{Context, Outcome, backup, decode, identity, init, lookup, placeholder, price};
use config::Config;
use tools::{BapCli, BbackupCli};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        },
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(&cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NotImplemented(p)) => {
            let mut out = std::io::stdout().lock();
            match p.render(&mut out) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    ui::print_error(&e);
                    ExitCode::FAILURE
                },
            }
        },
        Err(e) => {
            ui::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<Outcome> {
    let mut out = std::io::stdout().lock();

    // ── bsv-skills init ───────────────────────────────────────────────────────
    // Runs before config loading so a broken config file can be replaced.
    if cli.command == Some(Subcommand::Init) {
        return scaffold_config(cli, &mut out);
    }

    let cfg = load_config(cli)?;

    if cli.print_config {
        writeln!(out, "{cfg:#?}")?;
        return Ok(Outcome::Done);
    }

    let Some(command) = &cli.command else {
        Cli::command().write_help(&mut std::io::stderr())?;
        anyhow::bail!("a subcommand is required");
    };

    let ctx = Context {
        paths: cfg.paths.clone(),
        passphrase: std::env::var(error::PASSPHRASE_ENV).ok(),
        now: chrono::Utc::now(),
    };
    let bap = BapCli::new(cfg.tools.bap.as_str());
    let bbackup = BbackupCli::new(cfg.tools.bbackup.as_str());

    let outcome = match command {
        Subcommand::Price => {
            price::run(&api::WhatsOnChain::new(&cfg.api.base_url)?, &ctx, &mut out)?
        },
        Subcommand::Lookup { address, mode } => lookup::run(
            &api::WhatsOnChain::new(&cfg.api.base_url)?,
            address,
            mode.as_deref(),
            &mut out,
        )?,
        Subcommand::Decode { tx } => {
            decode::run(&api::WhatsOnChain::new(&cfg.api.base_url)?, tx, &mut out)?
        },

        Subcommand::Identity(IdentityCommand::Create {
            name,
            identity_type,
            output,
            password,
        }) => {
            let args = identity::CreateArgs {
                name: name.clone(),
                identity_type: identity_type.clone(),
                output: output.clone(),
                password: password.clone(),
            };
            identity::create(&bap, &ctx, &args, &mut out)?
        },
        Subcommand::Identity(IdentityCommand::List { backup, password }) => {
            identity::list(&bap, &ctx, backup, password.as_deref(), &mut out)?
        },
        Subcommand::Identity(IdentityCommand::ExportMember {
            backup,
            index,
            output,
            password,
        }) => {
            let args = identity::ExportArgs {
                backup: backup.clone(),
                index: index.clone(),
                output: output.clone(),
                password: password.clone(),
            };
            identity::export_member(&bap, &ctx, &args, &mut out)?
        },

        Subcommand::Backup(BackupCommand::Encrypt {
            input,
            output,
            password,
        }) => backup::encrypt(
            &bbackup,
            &ctx,
            input,
            output.as_deref(),
            password.as_deref(),
            &mut out,
        )?,
        Subcommand::Backup(BackupCommand::Decrypt {
            backup: file,
            output,
            password,
        }) => backup::decrypt(
            &bbackup,
            &ctx,
            file,
            output.as_deref(),
            password.as_deref(),
            &mut out,
        )?,

        Subcommand::Send { .. } => placeholder::send(),
        Subcommand::EncryptMessage { .. } => placeholder::encrypt_message(),
        Subcommand::Posts(PostsCommand::Create { .. }) => placeholder::create_post(),
        Subcommand::Posts(PostsCommand::Read { address }) => placeholder::read_posts(address),

        Subcommand::Registry(RegistryCommand::Show) => commands::registry::show(&ctx, &mut out)?,
        Subcommand::Registry(RegistryCommand::SetDefault { file }) => {
            commands::registry::set_default(&ctx, file, &mut out)?
        },

        Subcommand::Init => scaffold_config(cli, &mut out)?,
    };
    Ok(outcome)
}

fn scaffold_config(cli: &Cli, out: &mut dyn Write) -> Result<Outcome> {
    let path = cli
        .config
        .clone()
        .or_else(config::global_config_path)
        .context("no config directory on this platform; pass --config <path>")?;
    init::run(&path, out)?;
    Ok(Outcome::Done)
}

/// Global config, then `--config`, then the command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let global = config::global_config_path();
    let mut cfg = config::load_merged(global.as_deref(), cli.config.as_deref())?;
    if let Some(dir) = &cli.bsv_dir {
        cfg.paths.bsv_dir = dir.clone();
    }
    if let Some(url) = &cli.api_url {
        cfg.api.base_url = url.trim_end_matches('/').to_string();
    }
    Ok(cfg)
}
