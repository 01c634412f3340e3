//! Request builders for community operations.
//!
//! Communities are created and deleted by an app (client token, app-scoped
//! paths); joining and leaving happen with a user token.

use crate::error::SocialError;
use crate::http::{seg, HttpMethod, HttpRequest};
use crate::types::{Community, Limit};

use super::{to_body, SocialClient};

impl SocialClient {
    /// GET `community` — all communities visible to the user.
    pub fn build_get_communities(&self, token: &str, limit: Option<&Limit>) -> HttpRequest {
        self.get_with(
            token,
            "community".to_string(),
            limit.map(Limit::to_query).unwrap_or_default(),
        )
    }

    /// GET `community/{communityId}`.
    pub fn build_get_community(&self, token: &str, community_id: &str) -> HttpRequest {
        self.get(token, format!("community/{}", seg(community_id)))
    }

    /// POST `app/{appId}/community`.
    pub fn build_create_community(
        &self,
        token: &str,
        app_id: &str,
        community: &Community,
    ) -> Result<HttpRequest, SocialError> {
        let body = to_body(community)?;
        Ok(self.request(
            HttpMethod::Post,
            token,
            format!("app/{}/community", seg(app_id)),
            Vec::new(),
            Some(body),
        ))
    }

    /// DELETE `app/{appId}/community/{communityId}`.
    pub fn build_delete_community(
        &self,
        token: &str,
        app_id: &str,
        community_id: &str,
    ) -> HttpRequest {
        self.delete(
            token,
            format!("app/{}/community/{}", seg(app_id), seg(community_id)),
        )
    }

    /// PUT `user/community/{communityId}/member` — join the community.
    pub fn build_add_user_to_community(&self, token: &str, community_id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Put,
            token,
            format!("user/community/{}/member", seg(community_id)),
            Vec::new(),
            None,
        )
    }

    /// DELETE `user/community/{communityId}/member` — leave the community.
    pub fn build_remove_user_from_community(&self, token: &str, community_id: &str) -> HttpRequest {
        self.delete(token, format!("user/community/{}/member", seg(community_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::http::HttpMethod;
    use crate::types::{Community, Limit};

    #[test]
    fn list_without_limit_has_no_query() {
        let req = client().build_get_communities("tok", None);
        assert_eq!(req.path, "http://localhost:3000/community");
    }

    #[test]
    fn list_with_limit_appends_paging_query() {
        let limit = Limit {
            page: 1,
            page_size: 10,
            ..Limit::default()
        };
        let req = client().build_get_communities("tok", Some(&limit));
        assert_eq!(
            req.path,
            "http://localhost:3000/community?pageNum=1&pageSize=10&sortDirection=0"
        );
    }

    #[test]
    fn create_community_is_app_scoped() {
        let community = Community {
            name: "Commuters".to_string(),
            ..Community::default()
        };
        let req = client()
            .build_create_community("tok", "app1", &community)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/app/app1/community");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Commuters");
        assert!(body.get("memberIds").is_none());
    }

    #[test]
    fn membership_paths() {
        let req = client().build_add_user_to_community("tok", "c1");
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/user/community/c1/member");

        let req = client().build_remove_user_from_community("tok", "c1");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/user/community/c1/member");
    }
}
