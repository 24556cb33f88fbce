use actix_double_submit_csrf::{CsrfConfig, CsrfMiddleware, CsrfToken, csrf_token_handler};
use actix_http::Request;
use actix_http::body::{BoxBody, EitherBody};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::Method;
use actix_web::{App, HttpResponse, test, web};

#[allow(dead_code)]
pub const HOST: &str = "example.com";

pub async fn build_app(
    cfg: CsrfConfig,
) -> impl Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(CsrfMiddleware::new(cfg))
            .configure(configure_routes),
    )
    .await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/csrf-token", web::get().to(csrf_token_handler))
        .route(
            "/form",
            web::get().to(|csrf: CsrfToken| async move {
                HttpResponse::Ok().body(format!("token:{}", csrf.0))
            }),
        )
        .service(
            web::resource("/submit")
                .route(web::post().to(ok_handler))
                .route(web::put().to(ok_handler))
                .route(web::patch().to(ok_handler))
                .route(web::delete().to(ok_handler))
                .route(web::get().to(ok_handler))
                .route(web::head().to(ok_handler))
                .route(web::route().method(Method::OPTIONS).to(ok_handler))
                .route(
                    web::route()
                        .method(Method::from_bytes(b"PURGE").unwrap())
                        .to(ok_handler),
                ),
        )
        .route(
            "/echo",
            web::post().to(|body: String| async move { HttpResponse::Ok().body(body) }),
        );
}

async fn ok_handler() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// GETs the token endpoint on a fresh client and returns the body token and
/// the issued cookie.
#[allow(dead_code)]
pub async fn token_and_cookie<S>(app: &S, cookie_name: &str) -> (String, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let req = test::TestRequest::get().uri("/csrf-token").to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == cookie_name)
        .map(|c| c.into_owned())
        .expect("token cookie present");

    let body = test::read_body(resp).await;
    let token = String::from_utf8(body.to_vec()).unwrap();

    (token, cookie)
}

#[allow(dead_code)]
pub fn set_cookie_named(resp: &ServiceResponse<EitherBody<BoxBody>>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

#[allow(dead_code)]
pub fn tamper(token: &str) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}
