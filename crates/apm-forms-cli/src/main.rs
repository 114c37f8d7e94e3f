//! APM Forms CLI
//!
//! Runs the form engine against definition and submission files.
//!
//! # Usage
//!
//! ```bash
//! apm-forms validate --form lomba.json --values submission.json
//! apm-forms validate --registration --values pendaftaran.yaml --format json
//! apm-forms visible --form lomba.json --values submission.json
//! apm-forms check --form lomba.json
//! apm-forms templates --category selection
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "apm-forms")]
#[command(author = "APM Portal")]
#[command(version)]
#[command(about = "Dynamic registration form engine", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, short, env = "APM_FORMS_FORMAT")]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "APM_FORMS_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a submission against a form
    Validate {
        /// Form definition (JSON or YAML)
        #[arg(long, required_unless_present = "registration")]
        form: Option<PathBuf>,
        /// Submitted values (JSON or YAML)
        #[arg(long)]
        values: PathBuf,
        /// Also require the core registration fields
        #[arg(long)]
        registration: bool,
    },
    /// List the fields a submission makes visible
    Visible {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        values: PathBuf,
    },
    /// Report authoring problems in a form
    Check {
        #[arg(long)]
        form: PathBuf,
    },
    /// Show the field template palette
    Templates {
        #[arg(long)]
        category: Option<String>,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = config::Config::load(cli.profile.as_deref()).unwrap_or_default();
    init_tracing(cli.log_level.as_deref().or(config.log_level.as_deref()));

    let format = cli
        .format
        .or_else(|| config.output_format())
        .unwrap_or(output::OutputFormat::Table);
    let profile = cli.profile.as_deref();

    // Ok(false) means the input was read but rejected
    let result = match cli.command {
        Commands::Validate {
            form,
            values,
            registration,
        } => {
            let registration = registration || config.include_base_registration.unwrap_or(false);
            commands::validate::handle(form.as_deref(), &values, registration, format)
        }
        Commands::Visible { form, values } => commands::visible::handle(&form, &values, format).map(|_| true),
        Commands::Check { form } => commands::check::handle(&form, format),
        Commands::Templates { category } => {
            commands::templates::handle(category.as_deref(), format).map(|_| true)
        }
        Commands::Config { action } => commands::config::handle(action, profile).map(|_| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
