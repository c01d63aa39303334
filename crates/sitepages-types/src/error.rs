//! Error type shared by all sitepages crates
//!
//! `Error` is `Clone` because a single settings fetch result is handed to every
//! caller that was coalesced onto it.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// The external settings source could not deliver a settings record
	SettingsFetch(String),
	/// The caller gave up waiting (explicit cancellation token)
	Cancelled,
	ConfigError(String),
	Template(String),
	Io(String),
	Internal(String),
}

impl Error {
	/// Stable machine-readable code used in JSON error bodies
	pub fn code(&self) -> &'static str {
		match self {
			Error::SettingsFetch(_) => "E-SETTINGS-FETCH",
			Error::Cancelled => "E-CANCELLED",
			Error::ConfigError(_) => "E-CONFIG",
			Error::Template(_) => "E-TEMPLATE",
			Error::Io(_) | Error::Internal(_) => "E-INTERNAL",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::SettingsFetch(_) => StatusCode::BAD_GATEWAY,
			Error::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
			Error::ConfigError(_) | Error::Template(_) | Error::Io(_) | Error::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::SettingsFetch(msg) => write!(f, "Settings fetch failed: {}", msg),
			Error::Cancelled => write!(f, "Cancelled"),
			Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
			Error::Template(msg) => write!(f, "Template error: {}", msg),
			Error::Io(msg) => write!(f, "I/O error: {}", msg),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err.to_string())
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		// Internal details stay in the log
		let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
			tracing::error!("Request failed: {}", self);
			"Internal server error".to_string()
		} else {
			self.to_string()
		};
		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": message,
			}
		});
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
