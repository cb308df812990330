use std::future::IntoFuture;
use std::sync::Arc;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use task_service::config::Config;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::service::AuthService;
use task_service::inbound::http::router::create_router;
use task_service::inbound::http::router::AppState;
use task_service::outbound::repositories::PostgresTaskRepository;
use task_service::outbound::repositories::PostgresUserRepository;
use task_service::telemetry::init_tracing;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;
    init_tracing(&config.log)?;

    tracing::info!(
        service = "task-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );
    tracing::info!(
        http_address = %config.server.address(),
        request_timeout_secs = config.server.request_timeout_secs,
        read_timeout_secs = config.server.read_timeout_secs,
        log_format = ?config.log.format,
        "Configuration loaded"
    );
    if config.jwt.is_secret_weak() {
        tracing::warn!("jwt.secret is shorter than 32 bytes; use a longer random secret");
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.token_ttl(),
        (&config.password).into(),
    )?);

    tracing::info!(
        token_ttl_minutes = authenticator.token_ttl().num_minutes(),
        "Authenticator ready"
    );

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let task_repository = Arc::new(PostgresTaskRepository::new(pg_pool));

    let state = AppState {
        auth_service: Arc::new(AuthService::new(
            user_repository,
            Arc::clone(&authenticator),
        )),
        task_service: Arc::new(TaskService::new(task_repository)),
        authenticator,
    };

    let http_address = config.server.address();
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, config.server.http_timeouts());

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let mut http_server = tokio::spawn(
        axum::serve(http_listener, http_application)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .into_future(),
    );

    tokio::select! {
        result = &mut http_server => {
            result??;
            tracing::info!("Http server exited");
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let grace_period = config.server.shutdown_grace_period();
    tracing::info!(
        grace_period_secs = grace_period.as_secs(),
        "Shutting down, draining in-flight requests"
    );
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(grace_period, &mut http_server).await {
        Ok(result) => {
            result??;
            tracing::info!("Http server drained");
        }
        Err(_) => {
            tracing::warn!("Grace period elapsed, aborting remaining requests");
            http_server.abort();
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::signal;
        use tokio::signal::unix::SignalKind;

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
