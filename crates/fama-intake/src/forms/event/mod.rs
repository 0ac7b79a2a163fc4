//! Event registration form: a short sign-up with an age window and a WhatsApp confirmation.

mod notify;
mod registration;
mod router;
mod schema;
mod service;

#[cfg(test)]
mod tests;

pub use notify::{ConfirmationMessage, ConfirmationNotifier, NotifyError};
pub use registration::{EventRegistration, RegistrationRecord};
pub use router::event_router;
pub use schema::{registration_schema, MAXIMUM_AGE, MINIMUM_AGE};
pub use service::{EventRegistrationService, EventServiceError, Registered};
