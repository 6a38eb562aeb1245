pub mod app_config;
pub mod booking_repo;
pub mod mailer;

pub use booking_repo::{BookingStore, StoreError};
pub use mailer::SmtpNotifier;

use std::sync::Arc;

use hotel_core::{NoopNotifier, Notifier, NotifyError};

/// Pick the notifier the mail configuration asks for.
pub fn notifier_from_config(mail: &app_config::MailConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    if mail.enabled {
        tracing::info!("Mail notifications via {}:{}", mail.relay, mail.port);
        Ok(Arc::new(SmtpNotifier::new(mail)?))
    } else {
        tracing::info!("Mail notifications disabled");
        Ok(Arc::new(NoopNotifier))
    }
}
