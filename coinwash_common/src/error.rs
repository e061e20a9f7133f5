use ::core::fmt::Display;

use ::anyhow::Error;

pub type Result<T> = std::result::Result<T, CoinwashError>;

/// Category of a [CoinwashError].
/// Servers use it to pick the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinwashErrorType {
    NotFound,
    InvalidState,
    InsufficientFunds,
    IllegalArgument,
    FailToStartServer,
    FailToConnectDatabase,
    FailToReadDatabase,
    FailToUpdateDatabase,
    FailToLoadConfig,
}

impl Display for CoinwashErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotFound => "Not found",
            Self::InvalidState => "Invalid state",
            Self::InsufficientFunds => "Insufficient funds",
            Self::IllegalArgument => "Illegal argument",
            Self::FailToStartServer => "Fail to start server",
            Self::FailToConnectDatabase => "Fail to connect database",
            Self::FailToReadDatabase => "Fail to read database",
            Self::FailToUpdateDatabase => "Fail to update database",
            Self::FailToLoadConfig => "Fail to load config",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub struct CoinwashError {
    error_type: CoinwashErrorType,
    source: Error,
}

impl CoinwashError {
    pub fn new<E: Into<Error>>(error_type: CoinwashErrorType, source: E) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    pub fn get_error_type(&self) -> CoinwashErrorType {
        self.error_type
    }

    pub fn not_found<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::NotFound, e)
    }

    pub fn invalid_state<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::InvalidState, e)
    }

    pub fn insufficient_funds<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::InsufficientFunds, e)
    }

    pub fn illegal_argument<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::IllegalArgument, e)
    }

    pub fn fail_to_start_server<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::FailToStartServer, e)
    }

    pub fn fail_to_connect_database<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::FailToConnectDatabase, e)
    }

    pub fn fail_to_read_database<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::FailToReadDatabase, e)
    }

    pub fn fail_to_update_database<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::FailToUpdateDatabase, e)
    }

    pub fn fail_to_load_config<E: Into<Error>>(e: E) -> Self {
        Self::new(CoinwashErrorType::FailToLoadConfig, e)
    }
}

impl Display for CoinwashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_type, self.source)
    }
}

impl std::error::Error for CoinwashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl<T> From<CoinwashError> for Result<T> {
    fn from(val: CoinwashError) -> Self {
        Result::Err(val)
    }
}

impl From<std::io::Error> for CoinwashError {
    fn from(value: std::io::Error) -> Self {
        Self::fail_to_start_server(value)
    }
}
