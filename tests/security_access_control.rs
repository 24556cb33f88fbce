mod common;

use actix_double_submit_csrf::{CsrfConfig, DEFAULT_COOKIE_NAME, DEFAULT_HEADER};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use common::*;

#[actix_web::test]
async fn method_override_header_does_not_trigger_validation() {
    let app = build_app(CsrfConfig::default()).await;
    let req = test::TestRequest::get()
        .uri("/submit")
        .insert_header(("X-HTTP-Method-Override", "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn token_from_another_client_rejected() {
    let app = build_app(CsrfConfig::default()).await;
    let (token_a, _cookie_a) = token_and_cookie(&app, DEFAULT_COOKIE_NAME).await;
    let (_token_b, cookie_b) = token_and_cookie(&app, DEFAULT_COOKIE_NAME).await;

    let req = test::TestRequest::post()
        .uri("/submit")
        .insert_header((DEFAULT_HEADER, token_a))
        .cookie(cookie_b)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn short_cookie_cannot_be_planted() {
    let app = build_app(CsrfConfig::default()).await;
    let planted = "x";

    let req = test::TestRequest::post()
        .uri("/submit")
        .cookie(Cookie::new(DEFAULT_COOKIE_NAME, planted))
        .insert_header((DEFAULT_HEADER, planted))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn prefix_of_token_rejected() {
    let app = build_app(CsrfConfig::default()).await;
    let (token, cookie) = token_and_cookie(&app, DEFAULT_COOKIE_NAME).await;

    for presented in [&token[..token.len() - 1], &format!("{token}A")[..]] {
        let req = test::TestRequest::post()
            .uri("/submit")
            .insert_header((DEFAULT_HEADER, presented))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}

#[actix_web::test]
async fn rejected_request_never_reaches_handler() {
    let app = build_app(CsrfConfig::default()).await;
    let (_token, cookie) = token_and_cookie(&app, DEFAULT_COOKIE_NAME).await;

    let req = test::TestRequest::post()
        .uri("/echo")
        .insert_header((DEFAULT_HEADER, "wrong"))
        .cookie(cookie)
        .set_payload("payload-that-must-not-echo")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = test::read_body(resp).await;
    assert_eq!(body, "bad CSRF token".as_bytes());
}
