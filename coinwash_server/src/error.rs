use ::core::fmt::Display;

use ::axum::{
    response::{IntoResponse, Response},
    Json,
};
use ::coinwash_common::error::{CoinwashError, CoinwashErrorType::*};
use ::http::StatusCode;
use ::serde::Serialize;

pub(crate) type Result<T> = std::result::Result<T, CoinwashServerError>;

/// [CoinwashServerError] is a wrapper for [CoinwashError] to convert it into Axum response
#[derive(Debug)]
pub struct CoinwashServerError(CoinwashError);

/// Body of every error response
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl CoinwashServerError {
    fn get_status_code(&self) -> StatusCode {
        match self.0.get_error_type() {
            NotFound => StatusCode::NOT_FOUND,
            InvalidState => StatusCode::BAD_REQUEST,
            InsufficientFunds => StatusCode::BAD_REQUEST,
            IllegalArgument => StatusCode::BAD_REQUEST,
            FailToStartServer => StatusCode::INTERNAL_SERVER_ERROR,
            FailToConnectDatabase => StatusCode::INTERNAL_SERVER_ERROR,
            FailToReadDatabase => StatusCode::INTERNAL_SERVER_ERROR,
            FailToUpdateDatabase => StatusCode::INTERNAL_SERVER_ERROR,
            FailToLoadConfig => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoinwashError> for CoinwashServerError {
    fn from(error: CoinwashError) -> Self {
        Self(error)
    }
}

/// [CoinwashServerError] displays in the same way as [CoinwashError]
impl Display for CoinwashServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl IntoResponse for CoinwashServerError {
    fn into_response(self) -> Response {
        let status = self.get_status_code();
        if status.is_server_error() {
            ::coinwash_common::tracing::error!("{}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
