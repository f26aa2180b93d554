pub mod background;
pub mod bootstrap;
pub mod channel;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod notification;
pub mod shutdown;
pub mod status;
pub mod tracker;

#[cfg(test)]
mod test_support;

pub use bootstrap::{check_credentials, init_foundation};
pub use error::AlertError;
