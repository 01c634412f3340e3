//! Request builders for user and community entities.
//!
//! Entities live under two scopes. User entities are addressed by
//! `(appId, localId)` and can be written either by the owning user
//! (`user/...` paths) or on the user's behalf by the app (`app/...`
//! paths). Community entities hang off the community id. The server
//! assigns the canonical `uri` on first write.

use crate::error::SocialError;
use crate::http::{seg, HttpMethod, HttpRequest};
use crate::types::{entity_uri, Entity, Limit};

use super::{to_body, SocialClient};

impl SocialClient {
    /// GET `user/{appId}/entity` — entities the user owns under an app.
    pub fn build_get_user_entities(
        &self,
        token: &str,
        app_id: &str,
        limit: Option<&Limit>,
    ) -> HttpRequest {
        self.get_with(
            token,
            format!("user/{}/entity", seg(app_id)),
            limit.map(Limit::to_query).unwrap_or_default(),
        )
    }

    /// GET `user/{appId}/entity/{localId}`.
    pub fn build_get_user_entity(&self, token: &str, app_id: &str, local_id: &str) -> HttpRequest {
        self.get(
            token,
            format!("user/{}/entity/{}", seg(app_id), seg(local_id)),
        )
    }

    /// POST `app/{appId}/user/{userId}/entity` — create or update an
    /// entity on behalf of a user.
    pub fn build_create_or_update_user_entity_by_app(
        &self,
        token: &str,
        app_id: &str,
        user_owner: &str,
        entity: &Entity,
    ) -> Result<HttpRequest, SocialError> {
        require_local_id(entity)?;
        let body = to_body(entity)?;
        Ok(self.request(
            HttpMethod::Post,
            token,
            format!("app/{}/user/{}/entity", seg(app_id), seg(user_owner)),
            Vec::new(),
            Some(body),
        ))
    }

    /// PUT `user/{appId}/entity/{localId}` — update an entity as its
    /// owning user.
    ///
    /// A populated `uri` must agree with the `(appId, localId)` pair the
    /// entity is being written under; a stale URI is rejected before any
    /// network call.
    pub fn build_update_user_entity_by_user(
        &self,
        token: &str,
        app_id: &str,
        entity: &Entity,
    ) -> Result<HttpRequest, SocialError> {
        let local_id = require_local_id(entity)?;
        check_uri(entity, app_id, local_id)?;
        let body = to_body(entity)?;
        Ok(self.request(
            HttpMethod::Put,
            token,
            format!("user/{}/entity/{}", seg(app_id), seg(local_id)),
            Vec::new(),
            Some(body),
        ))
    }

    /// PUT `app/{appId}/user/{userId}/entity/{localId}`.
    pub fn build_update_user_entity_by_app(
        &self,
        token: &str,
        app_id: &str,
        user_owner: &str,
        entity: &Entity,
    ) -> Result<HttpRequest, SocialError> {
        let local_id = require_local_id(entity)?;
        check_uri(entity, app_id, local_id)?;
        let body = to_body(entity)?;
        Ok(self.request(
            HttpMethod::Put,
            token,
            format!(
                "app/{}/user/{}/entity/{}",
                seg(app_id),
                seg(user_owner),
                seg(local_id)
            ),
            Vec::new(),
            Some(body),
        ))
    }

    /// DELETE `user/{appId}/entity/{localId}`.
    pub fn build_delete_entity_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> HttpRequest {
        self.delete(
            token,
            format!("user/{}/entity/{}", seg(app_id), seg(local_id)),
        )
    }

    /// DELETE `app/{appId}/entity/{localId}`.
    pub fn build_delete_entity_by_app(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> HttpRequest {
        self.delete(token, format!("app/{}/entity/{}", seg(app_id), seg(local_id)))
    }

    /// GET `app/entity/info?uri=...` — resolve a URI to its owner record.
    pub fn build_get_entity_info_by_app(&self, token: &str, uri: &str) -> HttpRequest {
        self.get_with(
            token,
            "app/entity/info".to_string(),
            vec![("uri", uri.to_string())],
        )
    }

    /// GET `community/{communityId}/entity`.
    pub fn build_get_community_entities(
        &self,
        token: &str,
        community_id: &str,
        limit: Option<&Limit>,
    ) -> HttpRequest {
        self.get_with(
            token,
            format!("community/{}/entity", seg(community_id)),
            limit.map(Limit::to_query).unwrap_or_default(),
        )
    }

    /// GET `community/{communityId}/entity/{localId}`.
    pub fn build_get_community_entity(
        &self,
        token: &str,
        community_id: &str,
        local_id: &str,
    ) -> HttpRequest {
        self.get(
            token,
            format!("community/{}/entity/{}", seg(community_id), seg(local_id)),
        )
    }

    /// POST `community/{communityId}/entity` — create or update an entity
    /// owned by a community.
    pub fn build_create_or_update_community_entity(
        &self,
        token: &str,
        community_id: &str,
        entity: &Entity,
    ) -> Result<HttpRequest, SocialError> {
        require_local_id(entity)?;
        let body = to_body(entity)?;
        Ok(self.request(
            HttpMethod::Post,
            token,
            format!("community/{}/entity", seg(community_id)),
            Vec::new(),
            Some(body),
        ))
    }
}

fn require_local_id(entity: &Entity) -> Result<&str, SocialError> {
    entity
        .local_id
        .as_deref()
        .filter(|local_id| !local_id.is_empty())
        .ok_or_else(|| SocialError::InvalidArgument("entity local id is required".to_string()))
}

fn check_uri(entity: &Entity, app_id: &str, local_id: &str) -> Result<(), SocialError> {
    match entity.uri.as_deref() {
        None => Ok(()),
        Some(uri) if uri == entity_uri(app_id, local_id) => Ok(()),
        Some(uri) => Err(SocialError::InvalidArgument(format!(
            "entity uri {uri:?} does not match app {app_id:?} and local id {local_id:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::error::SocialError;
    use crate::http::HttpMethod;
    use crate::types::{entity_uri, Entity};

    fn entity(local_id: &str) -> Entity {
        Entity {
            local_id: Some(local_id.to_string()),
            name: "My event".to_string(),
            entity_type: "t1".to_string(),
            ..Entity::default()
        }
    }

    #[test]
    fn user_entity_paths() {
        let req = client().build_get_user_entity("tok", "app1", "e1");
        assert_eq!(req.path, "http://localhost:3000/user/app1/entity/e1");

        let req = client().build_delete_entity_by_user("tok", "app1", "e1");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/user/app1/entity/e1");
    }

    #[test]
    fn create_by_app_posts_entity_body() {
        let req = client()
            .build_create_or_update_user_entity_by_app("tok", "app1", "u1", &entity("e1"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/app/app1/user/u1/entity");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["localId"], "e1");
        assert_eq!(body["type"], "t1");
    }

    #[test]
    fn update_by_user_accepts_matching_uri() {
        let mut e = entity("e1");
        e.uri = Some(entity_uri("app1", "e1"));
        let req = client()
            .build_update_user_entity_by_user("tok", "app1", &e)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/user/app1/entity/e1");
    }

    #[test]
    fn update_by_user_rejects_stale_uri() {
        let mut e = entity("e1");
        e.uri = Some("dummie".to_string());
        let err = client()
            .build_update_user_entity_by_user("tok", "app1", &e)
            .unwrap_err();
        assert!(matches!(err, SocialError::InvalidArgument(_)));
    }

    #[test]
    fn missing_local_id_is_rejected_before_any_call() {
        let e = Entity {
            name: "nameless".to_string(),
            ..Entity::default()
        };
        let err = client()
            .build_create_or_update_community_entity("tok", "c1", &e)
            .unwrap_err();
        assert!(matches!(err, SocialError::InvalidArgument(_)));
    }

    #[test]
    fn entity_info_lookup_passes_uri_as_query() {
        let req = client().build_get_entity_info_by_app("tok", "urn:social:app1:e1");
        assert_eq!(
            req.path,
            "http://localhost:3000/app/entity/info?uri=urn%3Asocial%3Aapp1%3Ae1"
        );
    }

    #[test]
    fn community_entity_paths() {
        let req = client().build_get_community_entities("tok", "c1", None);
        assert_eq!(req.path, "http://localhost:3000/community/c1/entity");

        let req = client()
            .build_create_or_update_community_entity("tok", "c1", &entity("e2"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/community/c1/entity");
    }
}
