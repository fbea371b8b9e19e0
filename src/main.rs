// src/main.rs

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use filmoteca::application::{AppState, Console};
use filmoteca::config::Config;
use filmoteca::db::{
    check_store_credentials, create_connection_pool, get_connection, get_database_stats,
    initialize_database, verify_database_integrity,
};

/// Movie catalog and personal copy collection
#[derive(Parser, Debug)]
#[command(name = "filmoteca")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database file (overrides FILMOTECA_DB_PATH)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Override log level (default: info, or RUST_LOG)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_logger(level: Option<&str>) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level.unwrap_or("info"));
    env_logger::Builder::from_env(env).init();
}

/// Open the store and wire the services.
/// Any failure here leaves the console in its disabled state.
fn open_state(config: &Config) -> Result<AppState> {
    let pool = Arc::new(
        create_connection_pool(&config.database).context("Failed to open database")?,
    );

    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn).context("Failed to initialize schema")?;
        verify_database_integrity(&conn)?;
        check_store_credentials(&conn, &config.database.user, &config.database.password)?;

        let stats = get_database_stats(&conn)?;
        info!(
            "Database ready at {} ({} users, {} movies, {} copies, {} bytes)",
            config.database.path.display(),
            stats.user_count,
            stats.movie_count,
            stats.copy_count,
            stats.size_bytes
        );
    }

    let state = AppState::from_pool(pool);

    match &config.bootstrap_admin {
        Some(admin) => {
            if let Some(user) = state
                .user_service
                .ensure_bootstrap_admin(&admin.email, &admin.password)
                .context("Failed to create bootstrap administrator")?
            {
                info!("Log in as {} to manage the catalog", user.email);
            }
        }
        None => {
            if state.user_service.count_users()? == 0 {
                warn!("No users yet; set FILMOTECA_ADMIN_EMAIL and FILMOTECA_ADMIN_PASSWORD to create an administrator");
            }
        }
    }

    Ok(state)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(path) = &cli.database {
        config.database.path = path.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());

    let mut console = match load_config(&cli).and_then(|config| open_state(&config)) {
        Ok(state) => Console::new(state),
        Err(e) => {
            error!("Database unavailable: {:#}", e);
            Console::offline(format!("{:#}", e))
        }
    };

    let stdin = io::stdin();
    console.run(stdin.lock(), io::stdout().lock())?;
    Ok(())
}
