#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid country code: {0}. Expected 2 or 3 letters")]
    InvalidCode(String),

    #[error("Invalid search input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
