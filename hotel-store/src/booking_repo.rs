//! JSON-file booking store.
//!
//! The whole list lives in memory and is mirrored to a single JSON file that
//! is rewritten on every change. Writes go to `<file>.tmp` first and are then
//! renamed over the target, so a crash never leaves a truncated file behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hotel_core::Booking;
use thiserror::Error;
use tokio::fs;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bookings file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug)]
pub struct BookingStore {
    path: PathBuf,
    bookings: Vec<Booking>,
}

impl BookingStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file is a fresh start. A file that exists but cannot be read
    /// or parsed is an error.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No existing bookings file at {}, starting fresh", path.display());
                return Ok(Self { path, bookings: Vec::new() });
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        // `null` is what an empty list used to be saved as.
        let bookings: Option<Vec<Booking>> = serde_json::from_slice(&data)?;
        let bookings = bookings.unwrap_or_default();
        info!("Loaded {} bookings from {}", bookings.len(), path.display());

        Ok(Self { path, bookings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn contains_id(&self, booking_id: &str) -> bool {
        self.bookings.iter().any(|b| b.booking_id == booking_id)
    }

    pub fn append(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    /// Rewrite the bookings file from the in-memory list.
    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&self.bookings)?;
        let temp_path = self.temp_path();

        fs::write(&temp_path, json.as_bytes())
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        Ok(())
    }

    /// Append and persist. On a failed write the booking is dropped again so
    /// memory keeps matching disk.
    pub async fn record(&mut self, booking: Booking) -> Result<()> {
        self.append(booking);
        if let Err(e) = self.persist().await {
            self.bookings.pop();
            return Err(e);
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
