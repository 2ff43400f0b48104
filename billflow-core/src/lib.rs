pub mod billing;
pub mod domain;
mod error;

pub use error::DomainError;
