#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Rasterization Error: {0}")]
    Rasterization(String),

    #[error("Validation Error: {0} should be {1}")]
    Validation(String, String),
}
