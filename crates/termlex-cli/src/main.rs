mod auth;
mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use termlex_terminology::SynonymService;

use cli::{Cli, Commands, OutputFormat};
use output::print_error;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so piped output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;

    match &cli.command {
        Commands::Login(args) => {
            commands::auth::login(args, profile)?;
        }
        Commands::Logout => {
            commands::auth::logout(profile)?;
        }
        Commands::Whoami => {
            commands::auth::whoami(profile)?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                let defaults = config::terminology_config(&cfg);
                println!("{}: {}", "Profile".cyan(), profile);
                println!("{}: {}", "Value-set source".cyan(), defaults.value_set_base_url);
                println!("{}: {}", "Concept service".cyan(), defaults.concept_base_url);
                println!("{}: {}", "Ticket endpoint".cyan(), defaults.ticket_base_url);
                println!(
                    "{}: {}",
                    "Format".cyan(),
                    cfg.format.as_deref().unwrap_or("json")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "value-set-url" => cfg.value_set_base_url = Some(set_args.value.clone()),
                    "concept-url" => cfg.concept_base_url = Some(set_args.value.clone()),
                    "ticket-url" => cfg.ticket_base_url = Some(set_args.value.clone()),
                    "format" => cfg.format = Some(set_args.value.clone()),
                    other => anyhow::bail!(
                        "Unknown config key: {other}. Valid keys: value-set-url, concept-url, ticket-url, format"
                    ),
                }
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Resolve(args) => {
            let (service, format) = make_service(&cli, profile)?;
            commands::resolve::resolve(&service, &args.oids, args.hierarchy, args.names_only, format)
                .await?;
        }
        Commands::Codes(args) => {
            let (service, format) = make_service(&cli, profile)?;
            commands::resolve::codes(&service, &args.oids, format).await?;
        }
    }

    Ok(())
}

fn make_service(cli: &Cli, profile: &str) -> Result<(SynonymService, OutputFormat)> {
    let creds = auth::load_credentials(profile)?
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `termlex login` first"))?;
    let profile_cfg = config::load_profile(profile)?;
    let terminology = config::terminology_config(&profile_cfg);

    let format = cli.format.unwrap_or(match profile_cfg.format.as_deref() {
        Some("text") => OutputFormat::Text,
        _ => OutputFormat::Json,
    });

    let (value_set_creds, concept_creds) = creds.to_service_credentials();
    let service = SynonymService::new(&terminology, value_set_creds, concept_creds)?;
    Ok((service, format))
}
