//! Request builders for user group operations.

use serde_json::json;

use crate::error::SocialError;
use crate::http::{seg, HttpMethod, HttpRequest};
use crate::types::Group;

use super::{to_body, SocialClient};

impl SocialClient {
    /// GET `user/group` — all groups of the calling user.
    pub fn build_get_user_groups(&self, token: &str) -> HttpRequest {
        self.get(token, "user/group".to_string())
    }

    /// GET `user/group/{groupId}`.
    pub fn build_get_user_group(&self, token: &str, group_id: &str) -> HttpRequest {
        self.get(token, format!("user/group/{}", seg(group_id)))
    }

    /// POST `user/group` — create a group with the given name.
    pub fn build_create_user_group(
        &self,
        token: &str,
        name: &str,
    ) -> Result<HttpRequest, SocialError> {
        let body = to_body(&json!({ "name": name }))?;
        Ok(self.request(
            HttpMethod::Post,
            token,
            "user/group".to_string(),
            Vec::new(),
            Some(body),
        ))
    }

    /// PUT `user/group/{groupId}` — update name/composition of a group.
    pub fn build_update_user_group(
        &self,
        token: &str,
        group: &Group,
    ) -> Result<HttpRequest, SocialError> {
        let group_id = group
            .id
            .as_deref()
            .ok_or_else(|| SocialError::InvalidArgument("group id is required".to_string()))?;
        let body = to_body(group)?;
        Ok(self.request(
            HttpMethod::Put,
            token,
            format!("user/group/{}", seg(group_id)),
            Vec::new(),
            Some(body),
        ))
    }

    /// DELETE `user/group/{groupId}`.
    pub fn build_delete_user_group(&self, token: &str, group_id: &str) -> HttpRequest {
        self.delete(token, format!("user/group/{}", seg(group_id)))
    }

    /// PUT `user/group/{groupId}/members?userIds=a,b`.
    pub fn build_add_users_to_group(
        &self,
        token: &str,
        group_id: &str,
        user_ids: &[String],
    ) -> HttpRequest {
        self.request(
            HttpMethod::Put,
            token,
            format!("user/group/{}/members", seg(group_id)),
            vec![("userIds", user_ids.join(","))],
            None,
        )
    }

    /// DELETE `user/group/{groupId}/members?userIds=a,b`.
    pub fn build_remove_users_from_group(
        &self,
        token: &str,
        group_id: &str,
        user_ids: &[String],
    ) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            token,
            format!("user/group/{}/members", seg(group_id)),
            vec![("userIds", user_ids.join(","))],
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::error::SocialError;
    use crate::http::HttpMethod;
    use crate::types::Group;

    #[test]
    fn get_user_group_produces_expected_path() {
        let req = client().build_get_user_group("tok", "g1");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/user/group/g1");
        assert!(req.body.is_none());
    }

    #[test]
    fn get_user_group_parses_stub_body() {
        let group: Group = client()
            .parse_object(ok(r#"{"name":"Team A","socialId":1,"users":[]}"#))
            .unwrap()
            .unwrap();
        assert_eq!(group.name, "Team A");
        assert!(group.users.is_empty());
    }

    #[test]
    fn create_group_sends_name_body() {
        let req = client().build_create_user_group("tok", "friends").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/user/group");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "friends");
    }

    #[test]
    fn update_group_requires_id() {
        let group = Group {
            name: "no id yet".to_string(),
            ..Group::default()
        };
        let err = client().build_update_user_group("tok", &group).unwrap_err();
        assert!(matches!(err, SocialError::InvalidArgument(_)));
    }

    #[test]
    fn membership_calls_join_user_ids() {
        let ids = vec!["7".to_string(), "9".to_string()];
        let req = client().build_add_users_to_group("tok", "g1", &ids);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.path,
            "http://localhost:3000/user/group/g1/members?userIds=7%2C9"
        );

        let req = client().build_remove_users_from_group("tok", "g1", &ids);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(
            req.path,
            "http://localhost:3000/user/group/g1/members?userIds=7%2C9"
        );
    }

    #[test]
    fn identical_arguments_build_identical_requests() {
        let first = client().build_get_user_group("tok", "g1");
        let second = client().build_get_user_group("tok", "g1");
        assert_eq!(first.path, second.path);
        assert_eq!(first.body, second.body);
    }
}
