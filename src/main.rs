//! Postforge - compose a blog post block by block and export it as a
//! standalone static HTML page.

mod cleanup;
mod cli;
mod config;
mod embed;
mod error;
mod image;
mod layout;
mod logger;
mod post;
mod security;
mod utils;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PostConfig;
use error::PostError;
use logger::status_error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = PostConfig::load(cli)?;

    match &cli.command {
        Commands::Init { .. } => cli::init::new_project(&config),
        Commands::Start { args } => cli::start::start_post(&config, args),
        Commands::Add { block } => cli::add::add_block(&config, block),
        Commands::Resume { file, force } => cli::resume::resume_post(&config, file, *force),
        Commands::Status { json, pretty } => cli::status::show_status(&config, *json, *pretty),
        Commands::Preview { no_open } => cli::preview::open_preview(&config, *no_open),
        Commands::Export { keep_temp } => cli::export::export_post(&config, *keep_temp),
        Commands::Clean => cli::clean::clean(&config),
    }
}

/// User mistakes get their message alone; everything else shows its causes.
fn report(e: &anyhow::Error) {
    let post_error = e.downcast_ref::<PostError>();
    let retry = match post_error {
        Some(err) if err.is_retryable() => "nothing was removed, the command can be run again",
        _ => "",
    };

    if let Some(err) = post_error
        && err.is_user_facing()
    {
        status_error(&err.to_string(), retry);
        return;
    }

    let mut detail = e
        .chain()
        .skip(1)
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    detail.push(retry.to_string());
    status_error(&e.to_string(), &detail.join("\n"));
}
