//! Registration service - a single endpoint that signs up users.
//!
//! Each request is validated, written as one row to the remote table store,
//! and confirmed with an email sent over SMTP.

pub mod api;
pub mod config;
pub mod error;
pub mod mailer;
pub mod registration;
pub mod store;

pub use config::Config;
pub use error::RegistrationError;
pub use mailer::{Email, MailError, Mailer, SmtpMailer};
pub use registration::{validate_registration, FieldError, RegistrationRecord, ValidationFailure};
pub use store::{RegistrationStore, USERS_TABLE};
