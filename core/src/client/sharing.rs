//! Request builders for sharing and visibility.
//!
//! Visibility of a user entity is a sub-resource at `user/shared/{localId}`:
//! PUT replaces it, DELETE makes the entity private again, GET reads it
//! back. The listing endpoints return what others shared with the caller.
//! The legacy shared-content reads keep the old position/size/type query
//! convention.

use crate::error::SocialError;
use crate::http::{seg, HttpMethod, HttpRequest};
use crate::types::{Limit, ShareVisibility};

use super::{to_body, SocialClient};

/// Legacy paging triple: omitted position/size serialize as `-1`,
/// omitted type as empty.
fn page_window(
    position: Option<i64>,
    size: Option<i64>,
    type_id: Option<i64>,
) -> Vec<(&'static str, String)> {
    vec![
        ("position", position.unwrap_or(-1).to_string()),
        ("size", size.unwrap_or(-1).to_string()),
        (
            "type",
            type_id.map(|type_id| type_id.to_string()).unwrap_or_default(),
        ),
    ]
}

impl SocialClient {
    /// PUT `user/shared/{localId}` — share an entity with the given
    /// visibility.
    pub fn build_share_user_entity(
        &self,
        token: &str,
        local_id: &str,
        visibility: &ShareVisibility,
    ) -> Result<HttpRequest, SocialError> {
        let body = to_body(visibility)?;
        Ok(self.request(
            HttpMethod::Put,
            token,
            format!("user/shared/{}", seg(local_id)),
            Vec::new(),
            Some(body),
        ))
    }

    /// DELETE `user/shared/{localId}` — make the entity private again.
    pub fn build_unshare_user_entity(&self, token: &str, local_id: &str) -> HttpRequest {
        self.delete(token, format!("user/shared/{}", seg(local_id)))
    }

    /// GET `user/shared/{localId}` — current visibility of an entity.
    pub fn build_get_share_visibility(&self, token: &str, local_id: &str) -> HttpRequest {
        self.get(token, format!("user/shared/{}", seg(local_id)))
    }

    /// GET `user/shared` — entities others shared with the user.
    pub fn build_get_entities_shared_with_user(
        &self,
        token: &str,
        limit: Option<&Limit>,
    ) -> HttpRequest {
        self.get_with(
            token,
            "user/shared".to_string(),
            limit.map(Limit::to_query).unwrap_or_default(),
        )
    }

    /// GET `user/shared/{appId}/{localId}` — a single shared entity, if
    /// still visible to the user.
    pub fn build_get_entity_shared_with_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> HttpRequest {
        self.get(
            token,
            format!("user/shared/{}/{}", seg(app_id), seg(local_id)),
        )
    }

    /// GET `app/{appId}/community/{communityId}/shared`.
    pub fn build_get_entities_shared_with_community(
        &self,
        token: &str,
        app_id: &str,
        community_id: &str,
        limit: Option<&Limit>,
    ) -> HttpRequest {
        self.get_with(
            token,
            format!(
                "app/{}/community/{}/shared",
                seg(app_id),
                seg(community_id)
            ),
            limit.map(Limit::to_query).unwrap_or_default(),
        )
    }

    /// GET `app/{appId}/community/{communityId}/shared/{localId}`.
    pub fn build_get_entity_shared_with_community(
        &self,
        token: &str,
        app_id: &str,
        community_id: &str,
        local_id: &str,
    ) -> HttpRequest {
        self.get(
            token,
            format!(
                "app/{}/community/{}/shared/{}",
                seg(app_id),
                seg(community_id),
                seg(local_id)
            ),
        )
    }

    /// POST `sharedcontent?position=..&size=..&type=..` — legacy listing
    /// of content shared with the user from the sources in `visibility`.
    pub fn build_get_shared_contents(
        &self,
        token: &str,
        visibility: &ShareVisibility,
        position: Option<i64>,
        size: Option<i64>,
        type_id: Option<i64>,
    ) -> Result<HttpRequest, SocialError> {
        let body = to_body(visibility)?;
        Ok(self.request(
            HttpMethod::Post,
            token,
            "sharedcontent".to_string(),
            page_window(position, size, type_id),
            Some(body),
        ))
    }

    /// GET `content?position=..&size=..&type=..` — legacy listing of the
    /// user's own content.
    pub fn build_get_my_contents(
        &self,
        token: &str,
        position: Option<i64>,
        size: Option<i64>,
        type_id: Option<i64>,
    ) -> HttpRequest {
        self.get_with(
            token,
            "content".to_string(),
            page_window(position, size, type_id),
        )
    }
}
