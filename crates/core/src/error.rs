use techmed_types::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Current password is incorrect")]
    IncorrectCurrentPassword,
    #[error("authentication credentials were not provided or are invalid")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Speciality not found")]
    SpecialityNotFound,
    #[error("Unknown appointment status: {0}")]
    UnknownAppointmentStatus(String),

    #[error("data integrity violation: {0}")]
    IntegrityViolation(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CoreError {
    /// True when a database error is a UNIQUE constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            CoreError::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
