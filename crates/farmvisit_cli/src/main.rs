//! Operator CLI for survey sessions stored as JSON.
//!
//! # Responsibility
//! - Check, gate and assemble a saved session with the same rules the app
//!   runs.
//! - Submit a saved session to the survey backend.
//!
//! ```bash
//! farmvisit template --kind food > visit.json
//! farmvisit check visit.json --step 1
//! farmvisit submit visit.json --photo sawah.jpg
//! ```

mod commands;

use clap::{Parser, Subcommand};
use farmvisit_core::{default_log_level, init_logging_with, LogOptions};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "farmvisit")]
#[command(version)]
#[command(about = "Check, assemble and submit farm visit surveys")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = "FARMVISIT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; logging is off without it
    #[arg(long, global = true, env = "FARMVISIT_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core linkage information
    Ping,

    /// Print an empty session for one commodity kind
    Template {
        /// food, horticulture or plantation
        #[arg(long, value_parser = commands::parse_kind)]
        kind: farmvisit_core::CommodityKind,
    },

    /// Validate a session, one step or all of it
    Check {
        file: PathBuf,

        /// Step number 1-5; the whole session when omitted
        #[arg(long)]
        step: Option<u8>,

        /// Plot photo to validate with the session
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Show which steps a session may enter
    Gate { file: PathBuf },

    /// Print the multipart fields a session would send
    Payload {
        file: PathBuf,

        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Validate and submit a session
    Submit {
        file: PathBuf,

        /// Plot photo (JPEG or PNG, at most 5 MB)
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Survey API base URL
        #[arg(long, env = "SURVEY_API_BASE_URL")]
        api_base_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long, env = "SURVEY_API_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Template { .. } => "template",
            Self::Check { .. } => "check",
            Self::Gate { .. } => "gate",
            Self::Payload { .. } => "payload",
            Self::Submit { .. } => "submit",
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let options = LogOptions {
            level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: log_dir.display().to_string(),
            echo_stderr: true,
        };
        if let Err(err) = init_logging_with(&options) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let command = cli.command.name();
    info!("event=cli_command module=cli status=start command={command}");
    let result = match cli.command {
        Commands::Ping => Ok(commands::ping()),
        Commands::Template { kind } => commands::template(kind),
        Commands::Check { file, step, photo } => commands::check(&file, step, photo.as_deref()),
        Commands::Gate { file } => commands::gate(&file),
        Commands::Payload { file, photo } => commands::payload(&file, photo.as_deref()),
        Commands::Submit {
            file,
            photo,
            api_base_url,
            timeout_secs,
        } => commands::submit(
            &file,
            photo.as_deref(),
            &commands::SubmitArgs {
                api_base_url,
                timeout_secs,
            },
        ),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error command={command}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
