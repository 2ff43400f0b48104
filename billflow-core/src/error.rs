#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown resource type '{0}'")]
    UnknownResource(String),
    #[error("settlement day must be between 1 and 31, got {0}")]
    InvalidSettlementDay(i64),
}
