use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use bestiary::{
    application::{error::AppError, reference::ReferenceStore},
    cache::{CacheAside, CacheConfig, connect_store},
    config::{self, Command},
    infra::{
        datasets,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use tokio::{net::TcpListener, sync::Notify};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    telemetry::init(&settings.logging)?;

    let source = datasets::source_from_settings(&settings.data)?;
    let store = ReferenceStore::load(source.as_ref())?;

    match cli_args.command() {
        Command::Serve(_) => run_serve(settings, store).await,
        Command::Validate(_) => run_validate(&store),
    }
}

fn run_validate(store: &ReferenceStore) -> Result<(), AppError> {
    for (kind, count) in store.counts() {
        info!(
            target = "bestiary::validate",
            resource = kind.as_str(),
            records = count,
            "Dataset is valid"
        );
    }
    Ok(())
}

async fn run_serve(settings: config::Settings, store: ReferenceStore) -> Result<(), AppError> {
    let cache_config = CacheConfig::from(&settings.cache);
    let cache_store = connect_store(&cache_config).await;
    let cache = CacheAside::new(cache_store, &cache_config);

    let state = ApiState::new(Arc::new(store), cache);
    let router = http::build_router(state);

    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;
    info!(
        target = "bestiary::server",
        addr = %settings.server.addr,
        cache = cache_config.backend.as_str(),
        "Listening for lookups"
    );

    serve_until_shutdown(listener, router, settings.server.graceful_shutdown).await
}

/// Serve until a shutdown signal arrives, then drain in-flight requests for at
/// most `grace` before returning.
async fn serve_until_shutdown(
    listener: TcpListener,
    router: axum::Router,
    grace: Duration,
) -> Result<(), AppError> {
    let stop = Arc::new(Notify::new());
    let stop_server = stop.clone();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move { stop_server.notified().await })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map_err(|err| InfraError::from(err).into()),
        () = shutdown_signal() => {
            info!(
                target = "bestiary::server",
                grace_secs = grace.as_secs(),
                "Shutdown requested, draining connections"
            );
            stop.notify_one();
        }
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map_err(|err| InfraError::from(err).into()),
        Err(_) => {
            warn!(
                target = "bestiary::server",
                grace_secs = grace.as_secs(),
                "Graceful shutdown window elapsed; dropping remaining connections"
            );
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(target = "bestiary::server", error = %err, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(target = "bestiary::server", error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
