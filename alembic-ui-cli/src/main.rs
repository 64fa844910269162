use std::process::ExitCode;
use std::time::Duration;

use alembic_ui_cli::{run_dashboard, run_once, CliError};
use alembic_ui_core::DashboardConfig;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal dashboard for Alembic migrations
#[derive(Debug, Parser)]
#[command(name = "alembic-ui", version, about)]
struct Args {
    /// Base URL of the migration API [env: ALEMBIC_UI_API_BASE]
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Server root used for the health check [env: ALEMBIC_UI_SERVER_URL]
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,

    /// Request timeout in seconds [env: ALEMBIC_UI_TIMEOUT_SECS]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Print the current screen once and exit
    #[arg(long)]
    once: bool,
}

impl Args {
    /// Environment and `.env` first, then flags on top
    fn resolve_config(&self) -> Result<DashboardConfig, CliError> {
        let mut config = DashboardConfig::from_env()?;
        if let Some(api_base) = &self.api_base {
            config = config.with_api_base(api_base.clone());
        }
        if let Some(server_url) = &self.server_url {
            config = config.with_server_base(server_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::from(2);
        }
    };
    log::debug!("using {:?}", config);

    if args.once {
        return match run_once(config).await {
            Ok(outcome) => ExitCode::from(outcome.exit_code()),
            Err(e) => {
                eprintln!("❌ {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match run_dashboard(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
