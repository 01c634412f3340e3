//! HTTP request/response types shared between the client and the transport.
//!
//! # Design
//! Requests and responses are plain data. `SocialClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching
//! the network; `Transport` is the only code that performs I/O. The split
//! keeps every wire-contract detail (paths, query strings, headers, bodies)
//! deterministic and testable against stub responses.

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL, already carrying the base URL, the encoded
/// path segments and the query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data, fed to the parse helpers.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Percent-encode a value interpolated into a path segment.
pub(crate) fn seg(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Append query parameters to a URL, percent-encoding values.
///
/// Parameters are emitted in the order given, so identical input always
/// produces an identical URL.
pub(crate) fn append_query(mut url: String, params: &[(&str, String)]) -> String {
    for (i, (key, value)) in params.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_query_preserves_order() {
        let url = append_query(
            "http://localhost/content".to_string(),
            &[
                ("position", "-1".to_string()),
                ("size", "-1".to_string()),
                ("type", String::new()),
            ],
        );
        assert_eq!(url, "http://localhost/content?position=-1&size=-1&type=");
    }

    #[test]
    fn append_query_without_params_is_identity() {
        let url = append_query("http://localhost/user/group".to_string(), &[]);
        assert_eq!(url, "http://localhost/user/group");
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let url = append_query(
            "http://localhost/concept".to_string(),
            &[("prefix", "caffè bar".to_string())],
        );
        assert_eq!(url, "http://localhost/concept?prefix=caff%C3%A8%20bar");
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(seg("a/b c"), "a%2Fb%20c");
        assert_eq!(seg("plain-id"), "plain-id");
    }
}
