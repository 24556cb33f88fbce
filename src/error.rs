use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Why an `Origin`/`Referer` check failed. Logged, never sent to the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OriginError {
    #[error("no Origin or Referer header presented")]
    Missing,

    #[error("presented host {presented:?} does not match {expected:?}")]
    Mismatch { presented: String, expected: String },

    #[error("unparseable origin {0:?}")]
    Unparseable(String),
}

/// The response body is the `Display` text; variant details stay server-side.
#[derive(Error, Debug)]
pub enum CsrfError {
    #[error("failed to set CSRF cookie")]
    RandomSource(String),

    #[error("invalid origin")]
    InvalidOrigin(OriginError),

    #[error("missing CSRF token")]
    MissingToken,

    #[error("bad CSRF token")]
    BadToken,

    #[error("no token")]
    NoToken,
}

impl ResponseError for CsrfError {
    fn status_code(&self) -> StatusCode {
        match self {
            CsrfError::RandomSource(_) | CsrfError::NoToken => StatusCode::INTERNAL_SERVER_ERROR,
            CsrfError::InvalidOrigin(_) | CsrfError::MissingToken | CsrfError::BadToken => {
                StatusCode::FORBIDDEN
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }
}
