use std::path::Path;

use axum::{extract::State, response::Html};
use hotel_core::Booking;
use minijinja::{context, path_loader, Environment};

use crate::error::AppError;
use crate::state::AppState;

pub const HOME_TEMPLATE: &str = "index.html";
pub const BOOKING_TEMPLATE: &str = "hotel.html";

/// Renders the HTML views from templates on disk.
///
/// Templates are loaded on first use and cached by the environment, so a
/// missing or broken file only fails the requests that need it.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new(templates_dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(templates_dir.as_ref()));
        Self { env }
    }

    pub fn render(&self, template: &str, bookings: &[Booking]) -> Result<String, AppError> {
        let html = self
            .env
            .get_template(template)?
            .render(context! { bookings => bookings })?;
        Ok(html)
    }
}

/// GET /
pub async fn home_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_with_bookings(&state, HOME_TEMPLATE).await
}

/// GET /booking
pub async fn booking_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_with_bookings(&state, BOOKING_TEMPLATE).await
}

async fn render_with_bookings(state: &AppState, template: &str) -> Result<Html<String>, AppError> {
    let bookings = state.bookings.lock().await;
    state.pages.render(template, bookings.bookings()).map(Html)
}
