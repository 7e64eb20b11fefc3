use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
