//! Data model shared by the results service and its clients.

pub mod model;
pub mod requests;
