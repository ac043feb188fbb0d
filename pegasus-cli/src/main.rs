mod cli;
mod commands;
mod config;
mod error;
mod output;

use crate::{
    cli::{Args, Commands, OutputFormat},
    commands::CommandExecutor,
    config::AppConfig,
    error::{AppError, Result},
    output::OutputManager,
};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::process;
use tracing::{Level, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let output_format = args.output;

    if let Err(e) = run(args).await {
        if output_format.is_json() {
            let error_json = serde_json::json!({
                "success": false,
                "error": e.to_string(),
                "error_kind": e.kind(),
            });
            println!("{error_json}");
        } else {
            error!("Application error: {}", e);
            #[cfg(feature = "colored-output")]
            {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
            #[cfg(not(feature = "colored-output"))]
            {
                eprintln!("Error: {}", e);
            }
        }
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.verbose, args.quiet);

    if let Commands::Completions { shell } = &args.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Args::command();
        let bin_name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
        return Ok(());
    }

    if let Commands::Config { show, reset } = &args.command {
        if *reset {
            let path = AppConfig::reset(args.config.as_deref())?;
            println!("✓ Configuration reset to defaults ({})", path.display());
        } else if *show {
            let config = AppConfig::load(args.config.as_deref())?;
            println!("{}", config.show()?);
        } else {
            println!("Use --show to display current configuration or --reset to reset to defaults");
        }
        return Ok(());
    }

    let config = AppConfig::load(args.config.as_deref())?.with_overrides(
        args.api_base,
        args.storage,
        args.timeout,
    );
    let colored = config.colored_output && args.output == OutputFormat::Pretty;
    let executor = CommandExecutor::new(&config, OutputManager::new(colored, args.output))?;

    match args.command {
        Commands::Signin {
            email,
            password,
            remember,
        } => executor.sign_in(&email, password, remember).await,
        Commands::Signup {
            name,
            email,
            password,
            confirm,
        } => {
            executor
                .sign_up(&name, &email, &password, confirm.as_deref())
                .await
        }
        Commands::Signout => executor.sign_out(),
        Commands::Whoami { verify } => executor.whoami(verify).await,
        Commands::Content {
            kind,
            category,
            limit,
        } => executor.content(kind, &category, limit).await,
        Commands::Play { kind, id } => executor.play(kind, &id).await,
        Commands::Popup {
            kind,
            id,
            return_to,
        } => executor.popup(kind, &id, &return_to).await,
        Commands::Access { kind, id } => executor.access(kind, &id).await,
        Commands::Favorites { action } => executor.favorites(action).await,
        Commands::Comments { action } => executor.comments(action).await,
        Commands::Config { .. } | Commands::Completions { .. } => Err(AppError::InvalidInput(
            "command handled before configuration".to_string(),
        )),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .init();
}
