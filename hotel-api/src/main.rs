use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use hotel_api::{app, pages::PageRenderer, state, AppState};
use hotel_core::RandomBookingIds;
use hotel_store::{app_config::Config, notifier_from_config, BookingStore};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_api=debug,hotel_store=debug,hotel_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;

    let store = BookingStore::load(&config.storage.bookings_file)
        .await
        .context("Failed to load bookings")?;

    let notifier = notifier_from_config(&config.mail).context("Invalid mail configuration")?;

    let (shutdown_tx, shutdown_rx) = state::shutdown_channel();

    let app_state = AppState {
        bookings: Arc::new(Mutex::new(store)),
        booking_ids: Arc::new(RandomBookingIds),
        notifier,
        pages: Arc::new(PageRenderer::new(&config.web.templates_dir)),
        static_dir: config.web.static_dir.clone(),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Starting hotel booking server on {}", addr);

    let (fatal_tx, fatal_rx) = tokio::sync::oneshot::channel::<String>();
    let shutdown = async move {
        tokio::select! {
            reason = shutdown_rx => match reason {
                Ok(reason) => {
                    tracing::error!("Shutting down: {}", reason);
                    let _ = fatal_tx.send(reason);
                }
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down");
            }
        }
    };

    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    if let Ok(reason) = fatal_rx.await {
        bail!(reason);
    }

    Ok(())
}
