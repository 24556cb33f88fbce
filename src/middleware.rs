use actix_web::body::{EitherBody, MessageBody};
use actix_web::cookie::Cookie;
use actix_web::dev::forward_ready;
use actix_web::http::{Method, header};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};
use futures_util::future::{LocalBoxFuture, Ready, ok};
use std::rc::Rc;

use crate::config::CsrfConfig;
use crate::context::bind_token;
use crate::error::{CsrfError, OriginError};
use crate::extract::extract_client_token;
use crate::origin::{request_host, validate_origin_or_referer};
use crate::token::{MIN_TOKEN_LEN, eq_tokens, generate_token};

/// Methods that must present a matching token. Everything else only gets
/// the cookie ensured.
pub const UNSAFE_METHODS: [Method; 4] = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

type TokenSource = fn(usize) -> Result<String, CsrfError>;

/// Double-submit-cookie CSRF protection. Unsafe methods are forwarded only
/// when the submitted token equals the cookie token.
pub struct CsrfMiddleware {
    config: Rc<CsrfConfig>,
    token_source: TokenSource,
}

impl CsrfMiddleware {
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Rc::new(config.normalized()),
            token_source: generate_token,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_token_source(mut self, token_source: TokenSource) -> Self {
        self.token_source = token_source;
        self
    }
}

impl Default for CsrfMiddleware {
    fn default() -> Self {
        Self::new(CsrfConfig::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfMiddlewareImpl<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CsrfMiddlewareImpl {
            service: Rc::new(service),
            config: Rc::clone(&self.config),
            token_source: self.token_source,
        })
    }
}

pub struct CsrfMiddlewareImpl<S> {
    service: Rc<S>,
    config: Rc<CsrfConfig>,
    token_source: TokenSource,
}

impl<S, B> Service<ServiceRequest> for CsrfMiddlewareImpl<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = Rc::clone(&self.config);
        let token_source = self.token_source;

        Box::pin(async move {
            let (token, issued) = match resolve_token(&req, &config, token_source) {
                Ok(resolved) => resolved,
                Err(e) => {
                    if let CsrfError::RandomSource(cause) = &e {
                        log::error!("CSRF token generation failed: {cause}");
                    }
                    return Ok(req.error_response(e).map_into_right_body());
                }
            };

            bind_token(&req, &token);

            let mut res = if !UNSAFE_METHODS.contains(req.method()) {
                service.call(req).await?.map_into_left_body()
            } else {
                match validate(req, &token, &config).await {
                    Ok(req) => service.call(req).await?.map_into_left_body(),
                    Err(rejected) => rejected.map_into_right_body(),
                }
            };

            if issued {
                log::debug!("issuing new CSRF cookie {:?}", config.cookie_name);
                res.response_mut().add_cookie(&token_cookie(&config, &token))?;
            }

            Ok(res)
        })
    }
}

// Current token and whether it was just generated.
fn resolve_token(
    req: &ServiceRequest,
    config: &CsrfConfig,
    token_source: TokenSource,
) -> Result<(String, bool), CsrfError> {
    if let Some(cookie) = req.cookie(&config.cookie_name) {
        if cookie.value().len() >= MIN_TOKEN_LEN {
            return Ok((cookie.value().to_string(), false));
        }
    }

    token_source(config.token_bytes).map(|token| (token, true))
}

fn token_cookie(config: &CsrfConfig, token: &str) -> Cookie<'static> {
    let mut builder = Cookie::build(config.cookie_name.clone(), token.to_string())
        .path(config.cookie_path.clone())
        .secure(config.cookie_secure)
        .http_only(config.cookie_http_only)
        .same_site(config.cookie_same_site);

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(max_age) = config.cookie_max_age {
        builder = builder.max_age(max_age);
    }

    builder.finish()
}

async fn validate(
    req: ServiceRequest,
    cookie_token: &str,
    config: &CsrfConfig,
) -> Result<ServiceRequest, ServiceResponse> {
    if config.enforce_origin_check {
        if let Err(e) = check_origin(req.request(), config) {
            log::warn!("CSRF origin check failed for {} {}: {e}", req.method(), req.path());
            return Err(req.error_response(CsrfError::InvalidOrigin(e)));
        }
    }

    let (http_req, mut payload) = req.into_parts();

    let Some(client_token) = extract_client_token(&http_req, &mut payload, config).await else {
        log::debug!("no CSRF token on {} {}", http_req.method(), http_req.path());
        return Err(ServiceResponse::from_err(CsrfError::MissingToken, http_req));
    };

    if !eq_tokens(client_token.as_bytes(), cookie_token.as_bytes()) {
        log::warn!("CSRF token mismatch on {} {}", http_req.method(), http_req.path());
        return Err(ServiceResponse::from_err(CsrfError::BadToken, http_req));
    }

    Ok(ServiceRequest::from_parts(http_req, payload))
}

fn check_origin(req: &HttpRequest, config: &CsrfConfig) -> Result<(), OriginError> {
    let host = request_host(req);

    validate_origin_or_referer(
        req.headers().get(header::ORIGIN),
        req.headers().get(header::REFERER),
        host.as_deref(),
        config.allowed_origin.as_deref(),
    )
}
