use anyhow::Context;
use maxxzone_api::{build_router, AppState, Mailer};
use maxxzone_auth::SessionTokens;
use maxxzone_config::load as load_config;
use maxxzone_database::initialize_database;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("starting MaxxZone backend");

    let config = load_config().context("failed to load configuration")?;

    let pool = initialize_database(&config.database)
        .await
        .context("failed to initialize database")?;

    let tokens = SessionTokens::from_config(&config.auth);
    if !tokens.is_configured() {
        warn!("no jwt secret configured; login and protected routes will fail");
    }

    let mailer = Mailer::from_config(&config.mail).context("failed to build smtp mailer")?;
    info!(mail_enabled = mailer.is_some(), "mail subsystem ready");

    let state = AppState::new(pool, tokens, mailer, &config);
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    async {
        if let Err(error) = signal::ctrl_c().await {
            error!(?error, "failed to listen for shutdown signal");
        }
        info!("shutdown signal received");
    }
}
