use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeneticsError {
    /// A random operation was requested without a seeded RNG.
    #[error("No random number generator supplied: a seed is required for reproduction")]
    MissingRng,
    #[error("Invalid breeder configuration: {0}")]
    InvalidConfig(String),
}
