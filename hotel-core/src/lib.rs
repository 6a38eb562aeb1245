pub mod booking;
pub mod booking_id;
pub mod notifier;

pub use booking::{Booking, BookingForm, Confirmation};
pub use booking_id::{assign_booking_id, is_valid_booking_id, BookingIdGenerator, RandomBookingIds};
pub use notifier::{NoopNotifier, Notifier, NotifyError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No free booking identifier after {attempts} attempts")]
    IdentifierSpaceExhausted { attempts: usize },
}

pub type CoreResult<T> = Result<T, CoreError>;
