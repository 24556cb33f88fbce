use actix_double_submit_csrf::{CsrfConfig, CsrfMiddleware, CsrfToken, csrf_token_handler};
use actix_web::{App, HttpResponse, HttpServer, web};

// The token comes from a client cookie, so it is escaped like any other input.
fn transfer_form(token: &str) -> String {
    format!(
        r#"<form method="post" action="/transfer">
  <input type="hidden" name="csrf_token" value="{}">
  <button type="submit">Transfer</button>
</form>"#,
        html_escape::encode_double_quoted_attribute(token)
    )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    HttpServer::new(|| {
        let csrf_config = CsrfConfig::default()
            .with_enforce_origin(true, Some("127.0.0.1:8080".to_string()));

        App::new()
            .wrap(CsrfMiddleware::new(csrf_config))
            // SPA clients fetch the token here and echo it in X-CSRF-Token
            .route("/csrf-token", web::get().to(csrf_token_handler))
            // Server-rendered form carrying the token in a hidden field
            .route("/", web::get().to(|csrf: CsrfToken| async move {
                HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body(transfer_form(csrf.as_str()))
            }))
            // Only reached with a matching token from an allowed origin
            .route("/transfer", web::post().to(|| async move { HttpResponse::Created().body("ok") }))
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
