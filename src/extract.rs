use actix_http::error::PayloadError;
use actix_multipart::Multipart;
use actix_web::dev::Payload;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{HttpMessage, HttpRequest};
use futures_util::stream::{self, StreamExt};

use crate::config::CsrfConfig;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM: &str = "multipart/form-data";

/// Header first, then the form field (body, then query string). The body is
/// put back into `payload` after reading; unreadable or oversized bodies
/// yield `None`.
pub async fn extract_client_token(
    req: &HttpRequest,
    payload: &mut Payload,
    config: &CsrfConfig,
) -> Option<String> {
    // An undecodable header still counts as presented; it just never matches.
    let header_token = req
        .headers()
        .get(&config.header_name)
        .filter(|hv| !hv.is_empty());
    if let Some(hv) = header_token {
        return Some(String::from_utf8_lossy(hv.as_bytes()).into_owned());
    }

    let mut fields = Vec::new();
    let content_type = req.content_type();

    if content_type.eq_ignore_ascii_case(FORM_URLENCODED) {
        let body = buffer_body(payload, config.max_form_bytes).await?;
        if let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(&body) {
            fields.extend(pairs);
        }
    } else if content_type.eq_ignore_ascii_case(MULTIPART_FORM) {
        let body = buffer_body(payload, config.max_form_bytes).await?;
        fields.extend(multipart_fields(req, body, &config.form_field).await);
    }

    if let Ok(pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(req.query_string()) {
        fields.extend(pairs);
    }

    fields
        .into_iter()
        .find(|(name, _)| name == &config.form_field)
        .map(|(_, value)| value)
        .filter(|v| !v.is_empty())
}

async fn buffer_body(payload: &mut Payload, limit: usize) -> Option<Bytes> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(bytes) => {
                if body.len() + bytes.len() > limit {
                    log::warn!("form body exceeds {limit} bytes, ignoring it for CSRF token lookup");
                    return None;
                }
                body.extend_from_slice(&bytes);
            }
            Err(e) => {
                log::debug!("failed to read request body: {e}");
                return None;
            }
        }
    }

    let body = body.freeze();
    *payload = Payload::from(body.clone());
    Some(body)
}

// Text fields named `field`; file parts are skipped.
async fn multipart_fields(req: &HttpRequest, body: Bytes, field: &str) -> Vec<(String, String)> {
    let stream = stream::once(async move { Ok::<Bytes, PayloadError>(body) });
    let mut multipart = Multipart::new(req.headers(), stream);
    let mut found = Vec::new();

    while let Some(part) = multipart.next().await {
        let Ok(mut part) = part else {
            break;
        };

        let wanted = part.name() == Some(field)
            && part
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .is_none();

        let mut value = BytesMut::new();
        while let Some(chunk) = part.next().await {
            match chunk {
                Ok(bytes) if wanted => value.extend_from_slice(&bytes),
                Ok(_) => {}
                Err(_) => return found,
            }
        }

        if wanted {
            if let Ok(text) = String::from_utf8(value.to_vec()) {
                found.push((field.to_string(), text));
            }
        }
    }

    found
}
