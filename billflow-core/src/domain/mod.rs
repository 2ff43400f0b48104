pub mod dataset;
pub mod reading;
pub mod timestamp;

pub use dataset::{Dataset, Prices};
pub use reading::{Reading, ResourceKind};
