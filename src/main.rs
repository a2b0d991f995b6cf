//! SecureCheck - a terminal analytics dashboard for traffic-stop records.

use securecheck::cli::{Cli, OneShotCommand};
use securecheck::config::{Config, ConnectionConfig};
use securecheck::db::{self, DatabaseBackend, DatabaseClient, MockDatabaseClient};
use securecheck::error::{Result, SecureCheckError};
use securecheck::headless;
use securecheck::logging;
use securecheck::snapshot::StopSnapshot;
use securecheck::tui::{self, App};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Pick up DATABASE_URL / PG* variables from a local .env, if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    if let Err(msg) = cli.validate_one_shot() {
        eprintln!("{msg}");
        std::process::exit(2);
    }

    // File logging in dashboard mode keeps tracing out of the terminal;
    // one-shot mode logs to stderr
    if cli.one_shot().is_some() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli
        .parse_output_format()
        .map_err(SecureCheckError::config)?;

    // Listing the catalog needs no database at all
    if cli.one_shot() == Some(OneShotCommand::ListQueries) {
        print!("{}", headless::render_catalog(format));
        return Ok(());
    }

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let (db, connection_info) = open_database(&cli, &config).await?;

    match cli.one_shot() {
        Some(OneShotCommand::Summary) => {
            let snapshot = StopSnapshot::load(db.as_ref()).await?;
            let output = headless::render_summary(&snapshot, format);
            db.close().await?;
            print!("{output}");
            Ok(())
        }
        Some(OneShotCommand::Run(label)) => {
            let output = headless::run_catalog_query(db.as_ref(), &label, format).await;
            db.close().await?;
            print!("{}", output?);
            Ok(())
        }
        Some(OneShotCommand::ListQueries) => unreachable!("handled before connecting"),
        None => {
            info!("Loading stop snapshot");
            let snapshot = StopSnapshot::load(db.as_ref()).await?;
            info!(
                "Loaded {} stops ({} rows skipped)",
                snapshot.len(),
                snapshot.skipped_rows()
            );

            let app = App::new(&snapshot, connection_info, &config.dashboard);
            tui::run_dashboard(app, db).await
        }
    }
}

/// Opens the configured database client and describes it for the header.
async fn open_database(cli: &Cli, config: &Config) -> Result<(Box<dyn DatabaseClient>, String)> {
    if cli.mock_db {
        info!("Using mock database");
        return Ok((
            Box::new(MockDatabaseClient::new()),
            "mock database".to_string(),
        ));
    }

    let connection = resolve_connection(cli, config)?.ok_or_else(|| {
        SecureCheckError::config(
            "No database connection configured. \
             Pass a connection string, use -c <name>, or set PG* variables.",
        )
    })?;

    info!("Connection: {}", connection.display_string());
    let db = db::connect(DatabaseBackend::Postgres, &connection).await?;

    Ok((db, connection.display_string()))
}

/// Resolves the final connection configuration from CLI args, config file,
/// and environment.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    // Start with CLI connection config if provided
    let mut connection = cli.to_connection_config()?;

    // If no CLI connection, try named connection from config
    if connection.is_none() {
        if let Some(name) = cli.connection_name() {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(SecureCheckError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    // If still no connection, try default from config
    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    // Last resort: DATABASE_URL from the environment or a .env file
    if connection.is_none() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            connection = Some(ConnectionConfig::from_connection_string(&url)?);
        }
    }

    // Apply environment variable defaults
    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
    }

    Ok(connection)
}
