use actix_web::dev::Payload;
use actix_web::http::header::ContentType;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::{Ready, err, ok};

use crate::error::CsrfError;

/// Token bound to the current request by [`CsrfMiddleware`](crate::CsrfMiddleware).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for CsrfToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.csrf_token() {
            Some(token) => ok(CsrfToken(token)),
            None => {
                log::error!("CsrfToken extractor used without CSRF middleware");
                err(CsrfError::NoToken.into())
            }
        }
    }
}

/// Read access to the request-scoped token.
pub trait CsrfRequestExt {
    /// `None` outside the middleware's scope.
    fn csrf_token(&self) -> Option<String>;
}

impl<T: HttpMessage> CsrfRequestExt for T {
    fn csrf_token(&self) -> Option<String> {
        self.extensions().get::<CsrfToken>().map(|t| t.0.clone())
    }
}

pub(crate) fn bind_token<T: HttpMessage>(msg: &T, token: &str) {
    msg.extensions_mut().insert(CsrfToken(token.to_string()));
}

/// Writes the bound token as a `text/plain` body, for single-page apps that
/// fetch it out of band. Mount it behind the middleware:
///
/// ```no_run
/// use actix_web::{App, web};
/// use actix_double_submit_csrf::{CsrfConfig, CsrfMiddleware, csrf_token_handler};
///
/// let app = App::new()
///     .wrap(CsrfMiddleware::new(CsrfConfig::default()))
///     .route("/csrf-token", web::get().to(csrf_token_handler));
/// ```
pub async fn csrf_token_handler(req: HttpRequest) -> HttpResponse {
    match req.csrf_token() {
        Some(token) => HttpResponse::Ok()
            .insert_header(ContentType::plaintext())
            .body(token),
        None => {
            log::error!("token endpoint reached without CSRF middleware");
            actix_web::ResponseError::error_response(&CsrfError::NoToken)
        }
    }
}
