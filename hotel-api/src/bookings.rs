use std::convert::Infallible;

use axum::{
    extract::{Form, FromRequest, Multipart, Query, Request, State},
    http::header::CONTENT_TYPE,
    response::Redirect,
    routing::{post, MethodRouter},
};
use hotel_core::{assign_booking_id, Booking, BookingForm, Confirmation};
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

pub const BOOKING_PAGE: &str = "/booking";

/// POST /book. Every other method gets 405.
pub fn route() -> MethodRouter<AppState> {
    post(create_booking).fallback(method_not_allowed)
}

/// Submitted booking fields, gathered like a browser form post.
///
/// Fields come from a urlencoded or multipart body first, then from the query
/// string; the first value of a key wins. Anything that fails to parse is
/// treated as absent, so extraction never rejects the request.
pub struct BookingSubmission(pub BookingForm);

impl<S> FromRequest<S> for BookingSubmission
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query: Vec<(String, String)> = Query::try_from_uri(req.uri())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        let mut fields = if is_multipart {
            multipart_fields(req, state).await
        } else {
            Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map(|Form(pairs)| pairs)
                .unwrap_or_default()
        };
        fields.extend(query);

        Ok(Self(BookingForm::from_pairs(fields)))
    }
}

async fn multipart_fields<S: Send + Sync>(req: Request, state: &S) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let Ok(mut multipart) = Multipart::from_request(req, state).await else {
        return fields;
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        // File parts are not form values.
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if let Ok(value) = field.text().await {
            fields.push((name, value));
        }
    }

    fields
}

async fn create_booking(
    State(state): State<AppState>,
    BookingSubmission(form): BookingSubmission,
) -> Result<Redirect, AppError> {
    let booking = record_booking(&state, form).await?;
    info!("Booking created: {}", booking.booking_id);

    notify_guest(&state, &booking).await;

    Ok(Redirect::to(BOOKING_PAGE))
}

async fn record_booking(state: &AppState, form: BookingForm) -> Result<Booking, AppError> {
    let mut store = state.bookings.lock().await;

    let booking_id = assign_booking_id(state.booking_ids.as_ref(), |id| store.contains_id(id))?;
    let booking = form.into_booking(booking_id);

    if let Err(e) = store.record(booking.clone()).await {
        state
            .request_shutdown(format!("bookings file {} could not be written: {}", store.path().display(), e))
            .await;
        return Err(e.into());
    }

    Ok(booking)
}

/// One delivery attempt. Failures are logged and never undo the booking.
async fn notify_guest(state: &AppState, booking: &Booking) {
    if booking.email.is_empty() {
        info!("No email for booking {}, skipping confirmation", booking.booking_id);
        return;
    }

    let mail = Confirmation::for_booking(booking);
    match state.notifier.send(&mail.to, &mail.subject, &mail.body).await {
        Ok(()) => info!("Confirmation sent for booking {}", booking.booking_id),
        Err(e) => warn!("Failed to send confirmation for booking {}: {}", booking.booking_id, e),
    }
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
