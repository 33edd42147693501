mod cli;
mod commands;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, ColorMode, Commands, KeyAction};
use output::{OutputMode, Reporter};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Human
    };

    match cli.color {
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Auto => {}
    }

    let mut reporter = Reporter::new(mode);
    let config_dir = cli.config_dir.as_deref();

    let success = match cli.command {
        Commands::Review {
            input,
            html,
            output_dir,
            model,
        } => match commands::load_context(config_dir, &mut reporter) {
            Some(ctx) => commands::review::run_review(
                input.as_deref(),
                html.as_deref(),
                output_dir.as_deref(),
                model.as_deref(),
                &ctx,
                &mut reporter,
            ),
            None => false,
        },
        Commands::Key { action } => match commands::load_context(config_dir, &mut reporter) {
            Some(ctx) => match action {
                KeyAction::Set { key } => {
                    commands::key::run_key_set(key.as_deref(), &ctx, &mut reporter)
                }
                KeyAction::Status => commands::key::run_key_status(&ctx, &mut reporter),
                KeyAction::Remove => commands::key::run_key_remove(&ctx, &mut reporter),
            },
            None => false,
        },
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "codecritic",
                &mut std::io::stdout(),
            );
            true
        }
    };

    reporter.finish();

    if !success {
        std::process::exit(1);
    }
}

/// Install `env_logger`, honoring `RUST_LOG` over the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
