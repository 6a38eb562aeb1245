use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hotel_core::CoreError;
use hotel_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("could not save bookings: {0}")]
    Persistence(#[from] StoreError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Template(err) => {
                tracing::error!("Template rendering failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Could not render template")
            }
            AppError::Persistence(err) => {
                tracing::error!("Persisting bookings failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Could not save booking")
            }
            AppError::Core(err) => {
                tracing::error!("Booking failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Could not create booking")
            }
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Invalid request method"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
        };

        (status, message).into_response()
    }
}
