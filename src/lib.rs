//! Double-submit-cookie CSRF protection for actix-web.
//!
//! [`CsrfMiddleware`] makes sure every client holds a random token cookie and
//! binds that token to the request so handlers can render it
//! ([`CsrfToken`] extractor, [`CsrfRequestExt`]) or hand it out through
//! [`csrf_token_handler`]. Unsafe requests (`POST`, `PUT`, `PATCH`, `DELETE`)
//! must echo the token back in the configured header or form field, and can
//! additionally be required to come from an allowed `Origin`/`Referer` host.
//!
//! ```no_run
//! use actix_web::{App, HttpResponse, HttpServer, web};
//! use actix_double_submit_csrf::{CsrfConfig, CsrfMiddleware, csrf_token_handler};
//!
//! # async fn run() -> std::io::Result<()> {
//! HttpServer::new(|| {
//!     let cfg = CsrfConfig::default()
//!         .with_cookie_secure(true)
//!         .with_enforce_origin(true, Some("app.example.com".into()));
//!
//!     App::new()
//!         .wrap(CsrfMiddleware::new(cfg))
//!         .route("/csrf-token", web::get().to(csrf_token_handler))
//!         .route("/transfer", web::post().to(|| async { HttpResponse::Created().body("ok") }))
//! })
//! .bind(("127.0.0.1", 8080))?
//! .run()
//! .await
//! # }
//! ```
//!
//! This only stops forged cross-site requests. A script injected into the
//! protected origin can read the token like any legitimate script.

mod config;
mod context;
mod error;
mod extract;
mod middleware;
mod origin;
mod token;

pub use config::{
    CsrfConfig, DEFAULT_COOKIE_NAME, DEFAULT_COOKIE_PATH, DEFAULT_FORM_FIELD, DEFAULT_HEADER,
    DEFAULT_MAX_FORM_BYTES, DEFAULT_TOKEN_BYTES,
};
pub use context::{CsrfRequestExt, CsrfToken, csrf_token_handler};
pub use error::{CsrfError, OriginError};
pub use extract::extract_client_token;
pub use middleware::{CsrfMiddleware, CsrfMiddlewareImpl, UNSAFE_METHODS};
pub use origin::{request_host, validate_origin_or_referer};
pub use token::{MIN_TOKEN_LEN, eq_tokens, generate_token};
