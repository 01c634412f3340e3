//! Stateless request builder and response parser for the social service.
//!
//! # Design
//! `SocialClient` holds only the base URL and the decode policy; it carries
//! no mutable state between calls. Each remote operation has a `build_*`
//! method producing an `HttpRequest`, grouped by domain in the submodules
//! below. Responses are parsed by the generic helpers here: every endpoint
//! returns either a single object, a list, or a boolean flag, all behind
//! the same envelope convention. The caller (normally `SocialService`)
//! executes the HTTP round-trip between build and parse.

mod communities;
mod concepts;
mod entities;
mod feedback;
mod groups;
mod sharing;
mod topics;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::{self, DecodePolicy};
use crate::error::SocialError;
use crate::http::{append_query, HttpMethod, HttpRequest, HttpResponse};

/// Stateless client for the social service API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The authentication token is passed per call and
/// attached as a bearer `Authorization` header.
#[derive(Debug, Clone)]
pub struct SocialClient {
    base_url: String,
    policy: DecodePolicy,
}

impl SocialClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            policy: DecodePolicy::default(),
        }
    }

    /// Replace the decode policy (lenient by default).
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    pub(crate) fn request(
        &self,
        method: HttpMethod,
        token: &str,
        path: String,
        query: Vec<(&'static str, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("authorization".to_string(), format!("Bearer {token}")),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: append_query(format!("{}/{path}", self.base_url), &query),
            headers,
            body,
        }
    }

    pub(crate) fn get(&self, token: &str, path: String) -> HttpRequest {
        self.request(HttpMethod::Get, token, path, Vec::new(), None)
    }

    pub(crate) fn get_with(
        &self,
        token: &str,
        path: String,
        query: Vec<(&'static str, String)>,
    ) -> HttpRequest {
        self.request(HttpMethod::Get, token, path, query, None)
    }

    pub(crate) fn delete(&self, token: &str, path: String) -> HttpRequest {
        self.request(HttpMethod::Delete, token, path, Vec::new(), None)
    }

    /// Decode the response to a single object. `Ok(None)` means the
    /// resource does not exist (or, under the lenient policy, could not
    /// be decoded).
    pub fn parse_object<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Option<T>, SocialError> {
        check_status(&response)?;
        envelope::decode_object(&response.body, self.policy)
    }

    /// Decode the response to a list; an absent payload reads as empty.
    pub fn parse_list<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<T>, SocialError> {
        check_status(&response)?;
        envelope::decode_list(&response.body, self.policy)
    }

    /// Decode a boolean write-operation result.
    pub fn parse_flag(&self, response: HttpResponse) -> Result<bool, SocialError> {
        check_status(&response)?;
        envelope::decode_flag(&response.body, self.policy)
    }
}

pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<String, SocialError> {
    serde_json::to_string(value).map_err(|e| SocialError::Encode(e.to_string()))
}

/// Map non-success status codes to the appropriate `SocialError` variant.
fn check_status(response: &HttpResponse) -> Result<(), SocialError> {
    match response.status {
        200..=299 => Ok(()),
        403 => Err(SocialError::AccessDenied),
        status => Err(SocialError::Service {
            status,
            detail: response.body.clone(),
        }),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::types::Group;

    #[test]
    fn forbidden_maps_to_access_denied() {
        let err = client().parse_object::<Group>(status(403)).unwrap_err();
        assert!(matches!(err, SocialError::AccessDenied));
        let err = client().parse_flag(status(403)).unwrap_err();
        assert!(matches!(err, SocialError::AccessDenied));
    }

    #[test]
    fn server_failure_maps_to_service_error() {
        let err = client().parse_list::<Group>(status(500)).unwrap_err();
        assert!(matches!(err, SocialError::Service { status: 500, .. }));
    }

    #[test]
    fn success_returns_decoded_payload() {
        let group: Option<Group> = client()
            .parse_object(ok(r#"{"name":"Team A","socialId":1,"users":[]}"#))
            .unwrap();
        assert_eq!(group.unwrap().name, "Team A");
    }

    #[test]
    fn bearer_header_is_attached_to_every_request() {
        let c = client();
        let req = c.get("tok", "user/group".to_string());
        assert_eq!(auth_header(&req), Some("Bearer tok"));
        assert!(req
            .headers
            .iter()
            .any(|(key, value)| key == "accept" && value == "application/json"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = SocialClient::new("http://localhost:3000/");
        let req = c.get("tok", "user/group".to_string());
        assert_eq!(req.path, "http://localhost:3000/user/group");
    }

    #[test]
    fn bodied_requests_carry_content_type() {
        let c = client();
        let req = c.request(
            HttpMethod::Post,
            "tok",
            "user/group".to_string(),
            Vec::new(),
            Some(r#"{"name":"g"}"#.to_string()),
        );
        assert!(req
            .headers
            .iter()
            .any(|(key, value)| key == "content-type" && value == "application/json"));
    }
}
