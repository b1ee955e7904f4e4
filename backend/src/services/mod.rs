pub mod certificates;
pub mod messages;
pub mod results;
pub mod sessions;
pub mod settings;
