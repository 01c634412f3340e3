//! Blocking façade over the social service API.
//!
//! # Design
//! `SocialService` composes the stateless `SocialClient` with a
//! `Transport`; every public method runs build → execute → parse for one
//! remote operation and blocks for the duration of the round trip. The
//! instance holds no mutable state, so it can be shared freely across
//! threads. Single-object reads return `Ok(None)` when the resource does
//! not exist; write operations with a boolean wire result return `bool`.

use std::time::Duration;

use crate::client::SocialClient;
use crate::envelope::DecodePolicy;
use crate::error::SocialError;
use crate::transport::Transport;
use crate::types::{
    Comment, Community, Concept, Entity, EntityInfo, EntityType, Group, Limit, Rating,
    ShareVisibility, SharedContent, Topic,
};

/// Synchronous client for the social service backend.
///
/// The base URL is fixed at construction; the authentication token is
/// passed per call.
#[derive(Debug, Clone)]
pub struct SocialService {
    client: SocialClient,
    transport: Transport,
}

impl SocialService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: SocialClient::new(base_url),
            transport: Transport::new(),
        }
    }

    /// Override the fixed per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: SocialClient::new(base_url),
            transport: Transport::with_timeout(timeout),
        }
    }

    /// Replace the decode policy (lenient by default).
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.client = self.client.with_policy(policy);
        self
    }

    /// The underlying request builder, for callers that execute I/O
    /// themselves.
    pub fn client(&self) -> &SocialClient {
        &self.client
    }

    // --- groups ---

    /// Retrieve all groups of the calling user.
    pub fn get_user_groups(&self, token: &str) -> Result<Vec<Group>, SocialError> {
        let req = self.client.build_get_user_groups(token);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    /// Retrieve one group, `None` if it does not exist.
    pub fn get_user_group(
        &self,
        token: &str,
        group_id: &str,
    ) -> Result<Option<Group>, SocialError> {
        let req = self.client.build_get_user_group(token, group_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Create a group with the given name and return it populated.
    pub fn create_user_group(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Option<Group>, SocialError> {
        let req = self.client.build_create_user_group(token, name)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Update a group (requires `group.id`).
    pub fn update_user_group(
        &self,
        token: &str,
        group: &Group,
    ) -> Result<Option<Group>, SocialError> {
        let req = self.client.build_update_user_group(token, group)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn delete_user_group(&self, token: &str, group_id: &str) -> Result<bool, SocialError> {
        let req = self.client.build_delete_user_group(token, group_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    /// Add users to a group by their social ids.
    pub fn add_users_to_group(
        &self,
        token: &str,
        group_id: &str,
        user_ids: &[String],
    ) -> Result<bool, SocialError> {
        let req = self.client.build_add_users_to_group(token, group_id, user_ids);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    pub fn remove_users_from_group(
        &self,
        token: &str,
        group_id: &str,
        user_ids: &[String],
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_remove_users_from_group(token, group_id, user_ids);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    // --- communities ---

    /// Retrieve the communities visible to the user.
    pub fn get_communities(
        &self,
        token: &str,
        limit: Option<&Limit>,
    ) -> Result<Vec<Community>, SocialError> {
        let req = self.client.build_get_communities(token, limit);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_community(
        &self,
        token: &str,
        community_id: &str,
    ) -> Result<Option<Community>, SocialError> {
        let req = self.client.build_get_community(token, community_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Create a community on behalf of an app.
    pub fn create_community(
        &self,
        token: &str,
        app_id: &str,
        community: &Community,
    ) -> Result<Option<Community>, SocialError> {
        let req = self.client.build_create_community(token, app_id, community)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn delete_community(
        &self,
        token: &str,
        app_id: &str,
        community_id: &str,
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_delete_community(token, app_id, community_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    /// Subscribe the calling user to a community.
    pub fn add_user_to_community(
        &self,
        token: &str,
        community_id: &str,
    ) -> Result<bool, SocialError> {
        let req = self.client.build_add_user_to_community(token, community_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    pub fn remove_user_from_community(
        &self,
        token: &str,
        community_id: &str,
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_remove_user_from_community(token, community_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    // --- user entities ---

    /// Retrieve the entities the user owns under an app.
    pub fn get_user_entities(
        &self,
        token: &str,
        app_id: &str,
        limit: Option<&Limit>,
    ) -> Result<Vec<Entity>, SocialError> {
        let req = self.client.build_get_user_entities(token, app_id, limit);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_user_entity(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self.client.build_get_user_entity(token, app_id, local_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Create or update an entity on behalf of its owning user. The
    /// entity is matched by `(appId, localId)`.
    pub fn create_or_update_user_entity_by_app(
        &self,
        token: &str,
        app_id: &str,
        user_owner: &str,
        entity: &Entity,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self
            .client
            .build_create_or_update_user_entity_by_app(token, app_id, user_owner, entity)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Update an entity as its owning user. A populated `uri` that does
    /// not match the `(appId, localId)` pair is rejected with
    /// `InvalidArgument` before any network call.
    pub fn update_user_entity_by_user(
        &self,
        token: &str,
        app_id: &str,
        entity: &Entity,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self
            .client
            .build_update_user_entity_by_user(token, app_id, entity)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn update_user_entity_by_app(
        &self,
        token: &str,
        app_id: &str,
        user_owner: &str,
        entity: &Entity,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self
            .client
            .build_update_user_entity_by_app(token, app_id, user_owner, entity)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn delete_entity_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_delete_entity_by_user(token, app_id, local_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    pub fn delete_entity_by_app(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_delete_entity_by_app(token, app_id, local_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    /// Resolve an entity URI to its owner record, `None` for an unknown
    /// URI.
    pub fn get_entity_info_by_app(
        &self,
        token: &str,
        uri: &str,
    ) -> Result<Option<EntityInfo>, SocialError> {
        let req = self.client.build_get_entity_info_by_app(token, uri);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    // --- community entities ---

    pub fn get_community_entities(
        &self,
        token: &str,
        community_id: &str,
        limit: Option<&Limit>,
    ) -> Result<Vec<Entity>, SocialError> {
        let req = self
            .client
            .build_get_community_entities(token, community_id, limit);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_community_entity(
        &self,
        token: &str,
        community_id: &str,
        local_id: &str,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self
            .client
            .build_get_community_entity(token, community_id, local_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Create or update an entity owned by a community.
    pub fn create_or_update_community_entity(
        &self,
        token: &str,
        community_id: &str,
        entity: &Entity,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self
            .client
            .build_create_or_update_community_entity(token, community_id, entity)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    // --- sharing ---

    /// Share a user entity with the given visibility. Returns the
    /// server's confirmation flag.
    pub fn share_user_entity(
        &self,
        token: &str,
        local_id: &str,
        visibility: &ShareVisibility,
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_share_user_entity(token, local_id, visibility)?;
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    /// Make a shared entity private again.
    pub fn unshare_user_entity(&self, token: &str, local_id: &str) -> Result<bool, SocialError> {
        let req = self.client.build_unshare_user_entity(token, local_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    /// Read back the current visibility of a user entity.
    pub fn get_share_visibility(
        &self,
        token: &str,
        local_id: &str,
    ) -> Result<Option<ShareVisibility>, SocialError> {
        let req = self.client.build_get_share_visibility(token, local_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Entities other users or communities shared with the caller.
    pub fn get_entities_shared_with_user(
        &self,
        token: &str,
        limit: Option<&Limit>,
    ) -> Result<Vec<Entity>, SocialError> {
        let req = self.client.build_get_entities_shared_with_user(token, limit);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    /// A single shared entity, `None` when it is not (or no longer)
    /// visible to the caller.
    pub fn get_entity_shared_with_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self
            .client
            .build_get_entity_shared_with_user(token, app_id, local_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn get_entities_shared_with_community(
        &self,
        token: &str,
        app_id: &str,
        community_id: &str,
        limit: Option<&Limit>,
    ) -> Result<Vec<Entity>, SocialError> {
        let req = self.client.build_get_entities_shared_with_community(
            token,
            app_id,
            community_id,
            limit,
        );
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_entity_shared_with_community(
        &self,
        token: &str,
        app_id: &str,
        community_id: &str,
        local_id: &str,
    ) -> Result<Option<Entity>, SocialError> {
        let req = self.client.build_get_entity_shared_with_community(
            token,
            app_id,
            community_id,
            local_id,
        );
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Legacy listing of content shared with the user from the sources
    /// in `visibility`. Omitted position/size default to `-1`, omitted
    /// type to empty.
    pub fn get_shared_contents(
        &self,
        token: &str,
        visibility: &ShareVisibility,
        position: Option<i64>,
        size: Option<i64>,
        type_id: Option<i64>,
    ) -> Result<Vec<SharedContent>, SocialError> {
        let req = self
            .client
            .build_get_shared_contents(token, visibility, position, size, type_id)?;
        self.client.parse_list(self.transport.execute(&req)?)
    }

    /// Legacy listing of the user's own content.
    pub fn get_my_contents(
        &self,
        token: &str,
        position: Option<i64>,
        size: Option<i64>,
        type_id: Option<i64>,
    ) -> Result<Vec<SharedContent>, SocialError> {
        let req = self
            .client
            .build_get_my_contents(token, position, size, type_id);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    // --- entity types and concepts ---

    pub fn get_entity_types(
        &self,
        token: &str,
        limit: Option<&Limit>,
    ) -> Result<Vec<EntityType>, SocialError> {
        let req = self.client.build_get_entity_types(token, limit);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_entity_type(
        &self,
        token: &str,
        entity_type_id: &str,
    ) -> Result<Option<EntityType>, SocialError> {
        let req = self.client.build_get_entity_type(token, entity_type_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Create the entity type bound to a concept and return it populated.
    pub fn create_entity_type(
        &self,
        token: &str,
        concept_id: i64,
    ) -> Result<Option<EntityType>, SocialError> {
        let req = self.client.build_create_entity_type(token, concept_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn get_entity_type_by_concept(
        &self,
        token: &str,
        concept_id: i64,
    ) -> Result<Option<EntityType>, SocialError> {
        let req = self.client.build_get_entity_type_by_concept(token, concept_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    /// Entity types whose name starts with `prefix`; the server caps the
    /// result count at `max_results` (its default is 20).
    pub fn get_entity_types_by_prefix(
        &self,
        token: &str,
        prefix: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<EntityType>, SocialError> {
        let req = self
            .client
            .build_get_entity_types_by_prefix(token, prefix, max_results);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    /// Tag suggestions for a prefix.
    pub fn get_concepts_by_prefix(
        &self,
        token: &str,
        prefix: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<Concept>, SocialError> {
        let req = self
            .client
            .build_get_concepts_by_prefix(token, prefix, max_results);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_concept(&self, token: &str, concept_id: i64) -> Result<Option<Concept>, SocialError> {
        let req = self.client.build_get_concept(token, concept_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    // --- ratings and comments ---

    /// Rate an entity as the calling user.
    pub fn rate_entity_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
        value: f64,
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_rate_entity_by_user(token, app_id, local_id, value)?;
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    /// The calling user's rating of an entity, `None` if never rated.
    pub fn get_rating_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<Option<Rating>, SocialError> {
        let req = self.client.build_get_rating_by_user(token, app_id, local_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn remove_rating_by_user(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<bool, SocialError> {
        let req = self
            .client
            .build_remove_rating_by_user(token, app_id, local_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    /// Comment on an entity and return the stored comment.
    pub fn create_comment(
        &self,
        token: &str,
        text: &str,
        app_id: &str,
        local_id: &str,
    ) -> Result<Option<Comment>, SocialError> {
        let req = self
            .client
            .build_create_comment(token, text, app_id, local_id)?;
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn get_comments_by_entity(
        &self,
        token: &str,
        app_id: &str,
        local_id: &str,
        limit: Option<&Limit>,
    ) -> Result<Vec<Comment>, SocialError> {
        let req = self
            .client
            .build_get_comments_by_entity(token, app_id, local_id, limit);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_comment(
        &self,
        token: &str,
        comment_id: &str,
    ) -> Result<Option<Comment>, SocialError> {
        let req = self.client.build_get_comment(token, comment_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }

    pub fn delete_comment(&self, token: &str, comment_id: &str) -> Result<bool, SocialError> {
        let req = self.client.build_delete_comment(token, comment_id);
        self.client.parse_flag(self.transport.execute(&req)?)
    }

    // --- topics ---

    /// Retrieve all topics of the calling user.
    pub fn get_topics(&self, token: &str) -> Result<Vec<Topic>, SocialError> {
        let req = self.client.build_get_topics(token);
        self.client.parse_list(self.transport.execute(&req)?)
    }

    pub fn get_topic(&self, token: &str, topic_id: &str) -> Result<Option<Topic>, SocialError> {
        let req = self.client.build_get_topic(token, topic_id);
        self.client.parse_object(self.transport.execute(&req)?)
    }
}
