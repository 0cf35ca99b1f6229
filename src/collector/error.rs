use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectorErrorCode {
    InvalidArgument,
    Internal,
    Platform,
}

impl CollectorErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorErrorCode::InvalidArgument => "collector/invalid-argument",
            CollectorErrorCode::Internal => "collector/internal",
            CollectorErrorCode::Platform => "collector/platform",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CollectorError {
    pub code: CollectorErrorCode,
    message: String,
}

impl CollectorError {
    pub fn new(code: CollectorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for CollectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for CollectorError {}

pub type CollectorResult<T> = Result<T, CollectorError>;

pub fn invalid_argument(message: impl Into<String>) -> CollectorError {
    CollectorError::new(CollectorErrorCode::InvalidArgument, message)
}

pub fn internal_error(message: impl Into<String>) -> CollectorError {
    CollectorError::new(CollectorErrorCode::Internal, message)
}

pub fn platform_error(message: impl Into<String>) -> CollectorError {
    CollectorError::new(CollectorErrorCode::Platform, message)
}
