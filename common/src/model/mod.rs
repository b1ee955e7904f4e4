pub mod certificate;
pub mod error;
pub mod message;
pub mod record;
pub mod style;
