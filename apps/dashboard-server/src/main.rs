use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use url::Url;
use user_directory::api::rest::handlers::UsersApiState;
use user_directory::api::rest::routes;
use user_directory::infra::{seed::server_seed, HttpUserSource};
use user_directory::{ListEngine, UserDirectoryConfig, MODULE_NAME};

/// User dashboard server - users API and list engine tooling
#[derive(Parser)]
#[command(name = "dashboard-server")]
#[command(about = "User dashboard server - users API and list engine tooling")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the users API server
    Run,
    /// Check configuration
    Check,
    /// Load users from a remote API and print the first page
    Fetch {
        /// Base URL of the users API (defaults to user_directory.source_url)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::config::default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Dashboard server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let provider = AppConfigProvider::new(config.clone());
    let users_cfg: UserDirectoryConfig = provider.module_config(MODULE_NAME)?;
    users_cfg.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config, &users_cfg).await,
        Commands::Check => check_config(&config),
        Commands::Fetch { url } => fetch_users(&users_cfg, url.as_deref()).await,
    }
}

async fn run_server(config: &AppConfig, users_cfg: &UserDirectoryConfig) -> Result<()> {
    let state = Arc::new(UsersApiState::new(
        server_seed(),
        users_cfg.engine_config(),
        users_cfg.simulated_latency(),
    ));

    let mut router = routes::router(state);
    if config.server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_sec,
        )));
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server on {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                tracing::warn!("shutdown: SIGTERM handler unavailable ({e}); waiting for ctrl_c()");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("HTTP server shutting down gracefully");
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn fetch_users(users_cfg: &UserDirectoryConfig, url: Option<&str>) -> Result<()> {
    let raw = url.unwrap_or(&users_cfg.source_url);
    let base = Url::parse(raw).with_context(|| format!("invalid users API URL '{raw}'"))?;
    let source = HttpUserSource::new(&base, users_cfg.request_timeout())?;

    let mut engine = ListEngine::new(users_cfg.engine_config())?;
    engine
        .load(&source)
        .await
        .with_context(|| format!("Failed to load users from {}", source.endpoint()))?;

    let stats = engine.statistics();
    println!(
        "Loaded {} users ({} active, {} inactive)",
        stats.total, stats.active, stats.inactive
    );
    println!("Page {} of {}:", engine.current_page(), engine.total_pages());
    for user in engine.current_page_records() {
        println!(
            "  #{:<4} {:<20} {:<30} {:<10} {:<12} {:<8} {}",
            user.id,
            user.name,
            user.email,
            user.role,
            user.department,
            user.status.as_str(),
            user.join_date
        );
    }
    Ok(())
}
