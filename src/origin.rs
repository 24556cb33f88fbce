use actix_web::HttpRequest;
use actix_web::http::header::{self, HeaderValue};
use url::Url;

use crate::error::OriginError;

pub fn request_host(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|hv| hv.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.as_str().to_string()))
}

/// Same-host policy for unsafe requests.
///
/// `Origin` wins over `Referer` whenever it is present, even if it cannot be
/// decoded. The presented URL's `host[:port]` must equal `allowed` (or the
/// request host when no override is configured), ignoring case. Subdomains
/// are distinct hosts.
pub fn validate_origin_or_referer(
    origin: Option<&HeaderValue>,
    referer: Option<&HeaderValue>,
    request_host: Option<&str>,
    allowed: Option<&str>,
) -> Result<(), OriginError> {
    let expected = allowed
        .filter(|a| !a.is_empty())
        .or(request_host)
        .unwrap_or_default();

    let presented = match (non_empty(origin), non_empty(referer)) {
        (Some(origin), _) => origin,
        (None, Some(referer)) => referer,
        (None, None) => return Err(OriginError::Missing),
    };

    let host = authority_of(presented)?;
    if expected.is_empty() || !host.eq_ignore_ascii_case(expected) {
        return Err(OriginError::Mismatch {
            presented: host,
            expected: expected.to_string(),
        });
    }
    Ok(())
}

fn non_empty(value: Option<&HeaderValue>) -> Option<&HeaderValue> {
    value.filter(|v| !v.is_empty())
}

// `host` or `host:port`; default ports are dropped by the parser.
fn authority_of(raw: &HeaderValue) -> Result<String, OriginError> {
    let unparseable =
        || OriginError::Unparseable(String::from_utf8_lossy(raw.as_bytes()).into_owned());

    let text = raw.to_str().map_err(|_| unparseable())?;
    let url = Url::parse(text).map_err(|_| unparseable())?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(unparseable)?;

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
