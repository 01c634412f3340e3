//! Response-envelope unwrapping and payload decoding.
//!
//! # Design
//! Later server revisions wrap every payload in a `Result` envelope
//! `{"data": ..., "errorCode": ..., "errorMessage": ...}`, and sometimes
//! double-encode `data` as a JSON string. Earlier endpoints answer with the
//! bare payload. `unwrap_payload` accepts both, so one decode path serves
//! the whole API surface.
//!
//! Whether an undecodable payload is an error is a policy decision, not a
//! fixed rule: the historical contract treats it as "no such resource".
//! `DecodePolicy::Lenient` (the default) keeps that contract;
//! `DecodePolicy::Strict` promotes the same condition to
//! `SocialError::Decode`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SocialError;

/// How to treat a successful response whose payload cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Undecodable payloads read as "not found" (`None` / empty list).
    #[default]
    Lenient,
    /// Undecodable payloads surface as `SocialError::Decode`.
    Strict,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        map.contains_key("data")
            || map.contains_key("errorCode")
            || map.contains_key("errorMessage")
    })
}

fn soften<T: Default>(policy: DecodePolicy, detail: String) -> Result<T, SocialError> {
    match policy {
        DecodePolicy::Lenient => Ok(T::default()),
        DecodePolicy::Strict => Err(SocialError::Decode(detail)),
    }
}

/// Extract the payload value from a response body.
///
/// Returns `Ok(None)` when the body carries no payload: an empty body, an
/// envelope with absent/null `data`, or (lenient policy) a body that is not
/// valid JSON. A populated `errorCode` becomes `SocialError::Remote`
/// regardless of policy.
pub(crate) fn unwrap_payload(
    body: &str,
    policy: DecodePolicy,
) -> Result<Option<Value>, SocialError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return soften(policy, e.to_string()),
    };
    if !is_envelope(&value) {
        return Ok(Some(value));
    }
    // Envelope shape is fixed; a mismatch here is still a malformed body.
    let envelope: Envelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(e) => return soften(policy, e.to_string()),
    };
    if let Some(code) = envelope.error_code.filter(|code| !code.is_empty()) {
        return Err(SocialError::Remote {
            code,
            message: envelope.error_message.unwrap_or_default(),
        });
    }
    match envelope.data {
        None | Some(Value::Null) => Ok(None),
        // Some revisions JSON-encode the payload a second time.
        Some(Value::String(inner)) => match serde_json::from_str(&inner) {
            Ok(reparsed) => Ok(Some(reparsed)),
            Err(_) => Ok(Some(Value::String(inner))),
        },
        Some(payload) => Ok(Some(payload)),
    }
}

/// Decode a single-object payload; absent or (lenient) undecodable
/// payloads read as `None`.
pub(crate) fn decode_object<T: DeserializeOwned>(
    body: &str,
    policy: DecodePolicy,
) -> Result<Option<T>, SocialError> {
    match unwrap_payload(body, policy)? {
        None => Ok(None),
        Some(payload) => match serde_json::from_value(payload) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => soften(policy, e.to_string()),
        },
    }
}

/// Decode a list payload; absent or (lenient) undecodable payloads read
/// as an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(
    body: &str,
    policy: DecodePolicy,
) -> Result<Vec<T>, SocialError> {
    match unwrap_payload(body, policy)? {
        None => Ok(Vec::new()),
        Some(payload) => match serde_json::from_value(payload) {
            Ok(decoded) => Ok(decoded),
            Err(e) => soften(policy, e.to_string()),
        },
    }
}

/// Decode a boolean write result. The wire form varies across revisions:
/// bare `true`/`false`, the JSON-encoded string `"true"`/`"false"`, or
/// either of those wrapped in an envelope.
pub(crate) fn decode_flag(body: &str, policy: DecodePolicy) -> Result<bool, SocialError> {
    match unwrap_payload(body, policy)? {
        None => Ok(false),
        Some(Value::Bool(flag)) => Ok(flag),
        Some(Value::String(text)) => match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => soften(policy, format!("unexpected flag payload: {other:?}")),
        },
        Some(other) => soften(policy, format!("unexpected flag payload: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Group;

    #[test]
    fn bare_payload_passes_through() {
        let group: Option<Group> =
            decode_object(r#"{"name":"Team A","socialId":1}"#, DecodePolicy::Lenient).unwrap();
        assert_eq!(group.unwrap().name, "Team A");
    }

    #[test]
    fn envelope_payload_is_unwrapped() {
        let body = r#"{"data":{"name":"Team A","socialId":1},"errorCode":null,"errorMessage":null}"#;
        let group: Option<Group> = decode_object(body, DecodePolicy::Lenient).unwrap();
        assert_eq!(group.unwrap().social_id, 1);
    }

    #[test]
    fn string_encoded_data_is_reparsed() {
        let body = r#"{"data":"{\"name\":\"Team A\",\"socialId\":1}"}"#;
        let group: Option<Group> = decode_object(body, DecodePolicy::Strict).unwrap();
        assert_eq!(group.unwrap().name, "Team A");
    }

    #[test]
    fn null_data_reads_as_not_found() {
        let found: Option<Group> = decode_object(r#"{"data":null}"#, DecodePolicy::Strict).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn empty_body_reads_as_not_found() {
        let found: Option<Group> = decode_object("", DecodePolicy::Strict).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn error_code_maps_to_remote_error() {
        let body = r#"{"data":null,"errorCode":"404","errorMessage":"no such group"}"#;
        let err = decode_object::<Group>(body, DecodePolicy::Lenient).unwrap_err();
        match err {
            SocialError::Remote { code, message } => {
                assert_eq!(code, "404");
                assert_eq!(message, "no such group");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn truncated_object_is_lenient_none_strict_error() {
        let truncated = r#"{"name":"Team A","soc"#;
        let found: Option<Group> = decode_object(truncated, DecodePolicy::Lenient).unwrap();
        assert!(found.is_none());

        let err = decode_object::<Group>(truncated, DecodePolicy::Strict).unwrap_err();
        assert!(matches!(err, SocialError::Decode(_)));
    }

    #[test]
    fn wrong_shape_is_lenient_empty_strict_error() {
        let not_a_list = r#"{"data":{"name":"x"}}"#;
        let groups: Vec<Group> = decode_list(not_a_list, DecodePolicy::Lenient).unwrap();
        assert!(groups.is_empty());

        let err = decode_list::<Group>(not_a_list, DecodePolicy::Strict).unwrap_err();
        assert!(matches!(err, SocialError::Decode(_)));
    }

    #[test]
    fn list_with_empty_string_slot_still_fails_whole_decode() {
        // Mixed-type arrays are malformed; lenient decoding must not
        // silently keep a prefix of the elements.
        let mixed = r#"[{"name":"a","socialId":1},"",{"name":"b","socialId":2}]"#;
        let groups: Vec<Group> = decode_list(mixed, DecodePolicy::Lenient).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn flag_accepts_every_wire_form() {
        for body in ["true", "\"true\"", r#"{"data":true}"#, r#"{"data":"true"}"#] {
            assert!(decode_flag(body, DecodePolicy::Strict).unwrap(), "{body}");
        }
        for body in ["false", "\"false\"", r#"{"data":false}"#, r#"{"data":"false"}"#] {
            assert!(!decode_flag(body, DecodePolicy::Strict).unwrap(), "{body}");
        }
    }

    #[test]
    fn garbage_flag_is_lenient_false_strict_error() {
        assert!(!decode_flag("maybe", DecodePolicy::Lenient).unwrap());
        assert!(matches!(
            decode_flag("\"maybe\"", DecodePolicy::Strict),
            Err(SocialError::Decode(_))
        ));
    }
}
