use std::path::PathBuf;
use std::sync::Arc;

use hotel_core::{BookingIdGenerator, Notifier};
use hotel_store::BookingStore;
use tokio::sync::{oneshot, Mutex};

use crate::pages::PageRenderer;

/// Fired with a reason when the server can no longer keep its state consistent.
pub type ShutdownSender = Arc<Mutex<Option<oneshot::Sender<String>>>>;

pub fn shutdown_channel() -> (oneshot::Sender<String>, oneshot::Receiver<String>) {
    oneshot::channel()
}

#[derive(Clone)]
pub struct AppState {
    /// Single writer: id assignment, append and persist happen under this lock.
    pub bookings: Arc<Mutex<BookingStore>>,
    pub booking_ids: Arc<dyn BookingIdGenerator>,
    pub notifier: Arc<dyn Notifier>,
    pub pages: Arc<PageRenderer>,
    pub static_dir: PathBuf,
    pub shutdown_tx: ShutdownSender,
}

impl AppState {
    /// Ask the server to stop. Only the first request wins.
    pub async fn request_shutdown(&self, reason: String) {
        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(reason);
        }
    }
}
