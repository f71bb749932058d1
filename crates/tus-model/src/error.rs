use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("layout {layout}: {message}")]
    InvalidLayout { layout: String, message: String },
    #[error("layout {layout} declares module {module} more than once")]
    DuplicateModule { layout: String, module: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
