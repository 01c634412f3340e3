//! Request builders for ratings and comments.

use serde_json::json;

use crate::error::SocialError;
use crate::http::{seg, HttpMethod, HttpRequest};
use crate::types::Limit;

use super::{to_body, SocialClient};

impl SocialClient {
    /// POST `user/rating/{appId}/{localId}` — rate an entity as the
    /// calling user.
    pub fn build_rate_entity_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
        value: f64,
    ) -> Result<HttpRequest, SocialError> {
        let body = to_body(&json!({ "rating": value }))?;
        Ok(self.request(
            HttpMethod::Post,
            token,
            format!("user/rating/{}/{}", seg(app_id), seg(local_id)),
            Vec::new(),
            Some(body),
        ))
    }

    /// GET `user/rating/{appId}/{localId}` — the calling user's rating.
    pub fn build_get_rating_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> HttpRequest {
        self.get(
            token,
            format!("user/rating/{}/{}", seg(app_id), seg(local_id)),
        )
    }

    /// DELETE `user/rating/{appId}/{localId}`.
    pub fn build_remove_rating_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> HttpRequest {
        self.delete(
            token,
            format!("user/rating/{}/{}", seg(app_id), seg(local_id)),
        )
    }

    /// POST `user/comment/{appId}/{localId}` — comment on an entity.
    pub fn build_create_comment(
        &self,
        token: &str,
        text: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<HttpRequest, SocialError> {
        let body = to_body(&json!({ "text": text }))?;
        Ok(self.request(
            HttpMethod::Post,
            token,
            format!("user/comment/{}/{}", seg(app_id), seg(local_id)),
            Vec::new(),
            Some(body),
        ))
    }

    /// GET `user/comment/{appId}/{localId}` — comments on an entity.
    pub fn build_get_comments_by_entity(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
        limit: Option<&Limit>,
    ) -> HttpRequest {
        self.get_with(
            token,
            format!("user/comment/{}/{}", seg(app_id), seg(local_id)),
            limit.map(Limit::to_query).unwrap_or_default(),
        )
    }

    /// GET `user/comment/{commentId}`.
    pub fn build_get_comment(&self, token: &str, comment_id: &str) -> HttpRequest {
        self.get(token, format!("user/comment/{}", seg(comment_id)))
    }

    /// DELETE `user/comment/{commentId}`.
    pub fn build_delete_comment(&self, token: &str, comment_id: &str) -> HttpRequest {
        self.delete(token, format!("user/comment/{}", seg(comment_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::http::HttpMethod;

    #[test]
    fn rating_paths_and_body() {
        let req = client()
            .build_rate_entity_by_user("tok", "app1", "e1", 2.0)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/user/rating/app1/e1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["rating"], 2.0);

        let req = client().build_get_rating_by_user("tok", "app1", "e1");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/user/rating/app1/e1");

        let req = client().build_remove_rating_by_user("tok", "app1", "e1");
        assert_eq!(req.method, HttpMethod::Delete);
    }

    #[test]
    fn comment_paths_and_body() {
        let req = client()
            .build_create_comment("tok", "my comment", "app1", "e1")
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/user/comment/app1/e1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["text"], "my comment");

        let req = client().build_get_comments_by_entity("tok", "app1", "e1", None);
        assert_eq!(req.path, "http://localhost:3000/user/comment/app1/e1");

        let req = client().build_get_comment("tok", "k1");
        assert_eq!(req.path, "http://localhost:3000/user/comment/k1");

        let req = client().build_delete_comment("tok", "k1");
        assert_eq!(req.method, HttpMethod::Delete);
    }
}
