//! Anti-Forgery Token Sources
//!
//! The backend rejects state-changing POSTs without a matching CSRF token in
//! the `X-CSRFToken` header. Where the token comes from is up to the embedding
//! surface: a fixed value, a browser-style cookie header, or nothing at all.
//!
//! A missing token is not an error here. The request is still sent without the
//! header and the backend is left to reject it.

/// Default cookie the site stores its token in
pub const DEFAULT_COOKIE_NAME: &str = "csrftoken";

/// An anti-forgery token
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Wrap a token value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token value, for the request header
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; only a prefix ever reaches the logs.
impl std::fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "CsrfToken({prefix}…)")
    }
}

/// Supplies the current anti-forgery token
pub trait TokenSource: Send + Sync {
    /// Current token, if one is available
    fn token(&self) -> Option<CsrfToken>;
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn token(&self) -> Option<CsrfToken> {
        (**self).token()
    }
}

/// A token fixed at construction
#[derive(Clone, Debug)]
pub struct StaticToken(CsrfToken);

impl StaticToken {
    /// Create a source that always yields `value`
    pub fn new(value: impl Into<String>) -> Self {
        Self(CsrfToken::new(value))
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Option<CsrfToken> {
        Some(self.0.clone())
    }
}

/// Reads the token out of a `Cookie` header value
#[derive(Clone, Debug)]
pub struct CookieHeaderToken {
    header: String,
    cookie_name: String,
}

impl CookieHeaderToken {
    /// Read the default `csrftoken` cookie from `header`
    pub fn new(header: impl Into<String>) -> Self {
        Self::with_name(header, DEFAULT_COOKIE_NAME)
    }

    /// Read a custom cookie name from `header`
    pub fn with_name(header: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            cookie_name: cookie_name.into(),
        }
    }
}

impl TokenSource for CookieHeaderToken {
    fn token(&self) -> Option<CsrfToken> {
        cookie_value(&self.header, &self.cookie_name).map(CsrfToken::new)
    }
}

/// No token available
#[derive(Clone, Copy, Debug, Default)]
pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<CsrfToken> {
        None
    }
}

/// Find a cookie's value in a `name=value; name2=value2` header
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token() {
        let source = StaticToken::new("abc123");
        assert_eq!(source.token().unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_cookie_header_token() {
        let source = CookieHeaderToken::new("sessionid=xyz; csrftoken=Tok3n; theme=dark");
        assert_eq!(source.token().unwrap().as_str(), "Tok3n");
    }

    #[test]
    fn test_cookie_prefix_is_not_a_match() {
        let source = CookieHeaderToken::new("xcsrftoken=nope; csrftokenx=nope");
        assert!(source.token().is_none());
    }

    #[test]
    fn test_cookie_custom_name_and_quotes() {
        let source = CookieHeaderToken::with_name("my_csrf=\"q1\"", "my_csrf");
        assert_eq!(source.token().unwrap().as_str(), "q1");
    }

    #[test]
    fn test_empty_cookie_is_missing() {
        assert!(CookieHeaderToken::new("csrftoken=").token().is_none());
        assert!(CookieHeaderToken::new("").token().is_none());
        assert!(NoToken.token().is_none());
    }

    #[test]
    fn test_boxed_source() {
        let source: Box<dyn TokenSource> = Box::new(StaticToken::new("boxed"));
        assert_eq!(source.token().unwrap().as_str(), "boxed");
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", CsrfToken::new("supersecretvalue"));
        assert!(!rendered.contains("supersecretvalue"));
        assert!(rendered.starts_with("CsrfToken(supe"));
    }
}
