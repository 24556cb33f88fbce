use actix_web::cookie::SameSite;
use actix_web::cookie::time::Duration;

pub const DEFAULT_COOKIE_NAME: &str = "csrf_token";
pub const DEFAULT_COOKIE_PATH: &str = "/";
pub const DEFAULT_HEADER: &str = "X-CSRF-Token";
pub const DEFAULT_FORM_FIELD: &str = "csrf_token";
pub const DEFAULT_TOKEN_BYTES: usize = 32;
pub const DEFAULT_MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

/// Settings for [`CsrfMiddleware`](crate::CsrfMiddleware). Empty names and
/// zero sizes fall back to the defaults.
#[derive(Clone, Debug)]
pub struct CsrfConfig {
    pub cookie_name: String,
    pub cookie_path: String,
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    // Off by default: client script is expected to read the cookie.
    pub cookie_http_only: bool,
    pub cookie_same_site: SameSite,
    /// `None` issues a session cookie.
    pub cookie_max_age: Option<Duration>,
    pub header_name: String,
    /// Looked up in url-encoded or multipart bodies, then the query string.
    pub form_field: String,
    pub enforce_origin_check: bool,
    /// `host[:port]` accepted by the origin check; `None` uses the request host.
    pub allowed_origin: Option<String>,
    /// Random bytes per token, before encoding.
    pub token_bytes: usize,
    pub max_form_bytes: usize,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        CsrfConfig {
            cookie_name: DEFAULT_COOKIE_NAME.into(),
            cookie_path: DEFAULT_COOKIE_PATH.into(),
            cookie_domain: None,
            cookie_secure: false,
            cookie_http_only: false,
            cookie_same_site: SameSite::Lax,
            cookie_max_age: None,
            header_name: DEFAULT_HEADER.into(),
            form_field: DEFAULT_FORM_FIELD.into(),
            enforce_origin_check: false,
            allowed_origin: None,
            token_bytes: DEFAULT_TOKEN_BYTES,
            max_form_bytes: DEFAULT_MAX_FORM_BYTES,
        }
    }
}

impl CsrfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie_path = path.into();
        self
    }

    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn with_cookie_http_only(mut self, http_only: bool) -> Self {
        self.cookie_http_only = http_only;
        self
    }

    pub fn with_cookie_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie_same_site = same_site;
        self
    }

    pub fn with_cookie_max_age(mut self, max_age: Duration) -> Self {
        self.cookie_max_age = Some(max_age);
        self
    }

    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn with_form_field(mut self, field: impl Into<String>) -> Self {
        self.form_field = field.into();
        self
    }

    /// Enables or disables the `Origin`/`Referer` check. An `allowed_origin`
    /// of `None` compares against the request's own host.
    pub fn with_enforce_origin(mut self, enforce: bool, allowed_origin: Option<String>) -> Self {
        self.enforce_origin_check = enforce;
        self.allowed_origin = allowed_origin;
        self
    }

    pub fn with_token_bytes(mut self, n: usize) -> Self {
        self.token_bytes = n;
        self
    }

    pub fn with_max_form_bytes(mut self, limit: usize) -> Self {
        self.max_form_bytes = limit;
        self
    }

    /// Replaces unset fields with the defaults.
    pub(crate) fn normalized(mut self) -> Self {
        fn or_default(value: &mut String, default: &str) {
            if value.is_empty() {
                *value = default.to_string();
            }
        }

        or_default(&mut self.cookie_name, DEFAULT_COOKIE_NAME);
        or_default(&mut self.cookie_path, DEFAULT_COOKIE_PATH);
        or_default(&mut self.header_name, DEFAULT_HEADER);
        or_default(&mut self.form_field, DEFAULT_FORM_FIELD);

        if self.token_bytes == 0 {
            self.token_bytes = DEFAULT_TOKEN_BYTES;
        }
        if self.max_form_bytes == 0 {
            self.max_form_bytes = DEFAULT_MAX_FORM_BYTES;
        }
        self.cookie_domain = self.cookie_domain.filter(|d| !d.is_empty());
        self.allowed_origin = self.allowed_origin.filter(|o| !o.is_empty());
        self
    }
}
