use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Unknown strategy kind: {0}")]
    UnknownKind(String),
    #[error("Malformed strategy payload: {0}")]
    MalformedPayload(String),
}
