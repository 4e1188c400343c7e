use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pressroom_api::config::ServerConfig;
use pressroom_api::router::build_app_router;
use pressroom_api::state::AppState;
use pressroom_db::DbPool;
use pressroom_events::{ApprovalNotifier, EmailConfig, EmailDelivery, EventBus};
use tokio::task::JoinHandle;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "pressroom_api=debug,pressroom_events=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        app_base_url = %config.app_base_url,
        "Pressroom API starting"
    );

    let pool = connect_database().await;

    let event_bus = Arc::new(EventBus::default());
    let notifier = spawn_approval_notifier(&event_bus, &config);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    let host = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The router (and every clone of the state) is gone now, so this is the
    // last sender. Dropping it lets the notifier finish its backlog and exit.
    drop(event_bus);
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(grace, notifier).await {
        Ok(_) => tracing::info!("Approval notifier drained"),
        Err(_) => tracing::warn!(
            grace_secs = config.shutdown_timeout_secs,
            "Approval notifier still busy at shutdown, pending emails dropped"
        ),
    }
    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify the connection and bring the schema up to date.
async fn connect_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = pressroom_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");
    pressroom_db::health_check(&pool)
        .await
        .expect("Database is not answering queries");
    pressroom_db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");
    tracing::info!("Database ready");
    pool
}

fn spawn_approval_notifier(bus: &EventBus, config: &ServerConfig) -> JoinHandle<()> {
    let mailer = EmailConfig::from_env()
        .map(|email| EmailDelivery::new(email).expect("Invalid SMTP configuration"));
    if mailer.is_none() {
        tracing::warn!("SMTP_HOST not set, approval requests will not be emailed");
    }
    let notifier = ApprovalNotifier::new(mailer, config.app_base_url.clone());
    tokio::spawn(notifier.run(bus.subscribe()))
}

/// Resolves on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("SIGINT received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
