//! In-memory stub of the social service backend.
//!
//! Implements the subset of the wire contract the client exercises:
//! groups, communities, entity types, user and community entities,
//! sharing, ratings, comments and topics. All payloads are wrapped in the
//! `{"data": ...}` envelope. Requests must carry a bearer token; the token
//! doubles as the acting user id, and the reserved token `forbidden` is
//! always answered with 403. DTOs are defined independently from the core
//! crate so integration tests catch schema drift.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MinimalProfile {
    pub social_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub surname: String,
    pub known: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub social_id: i64,
    pub name: String,
    pub total_members: i64,
    pub users: Vec<MinimalProfile>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub name: String,
    pub creation_time: i64,
    pub last_modified_time: i64,
    pub total_members: i64,
    pub member_ids: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Visibility {
    pub users: Vec<String>,
    pub groups: Vec<String>,
    pub communities: Vec<String>,
    pub all_users: bool,
    pub all_known_users: bool,
    pub all_communities: bool,
    pub all_known_communities: bool,
}

impl Visibility {
    fn is_private(&self) -> bool {
        !self.all_users
            && !self.all_known_users
            && !self.all_communities
            && !self.all_known_communities
            && self.users.is_empty()
            && self.groups.is_empty()
            && self.communities.is_empty()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_owner: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub tags: Vec<Concept>,
    pub relations: Vec<String>,
    pub rating: f64,
    pub total_voters: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Concept {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityType {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<Concept>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub app_id: String,
    pub local_id: String,
    pub creation_time: i64,
    pub deleted: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Topic {
    pub social_id: i64,
    pub name: String,
    pub status: String,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug)]
struct StoredEntity {
    numeric_id: i64,
    app_id: String,
    user_owner: Option<String>,
    community_owner: Option<String>,
    entity: Entity,
}

#[derive(Clone, Debug)]
struct StoredCommunity {
    app_id: String,
    community: Community,
}

#[derive(Debug, Default)]
pub struct SocialState {
    next_id: i64,
    groups: HashMap<String, Group>,
    communities: HashMap<String, StoredCommunity>,
    entity_types: HashMap<String, EntityType>,
    concepts: Vec<Concept>,
    // keyed by (app id, local id)
    entities: HashMap<(String, String), StoredEntity>,
    // keyed by (user id, app id, local id)
    ratings: HashMap<(String, String, String), f64>,
    comments: HashMap<String, Comment>,
    topics: Vec<Topic>,
}

impl SocialState {
    fn seeded() -> Self {
        let mut state = SocialState::default();
        state.concepts = ["event", "experience", "computer file", "journal", "photo"]
            .iter()
            .enumerate()
            .map(|(i, name)| Concept {
                id: Some(i as i64 + 1),
                name: name.to_string(),
                description: Some(format!("the {name} concept")),
                summary: None,
            })
            .collect();
        state.topics = vec![Topic {
            social_id: 1,
            name: "announcements".to_string(),
            status: "ACTIVE".to_string(),
            keywords: vec!["welcome".to_string()],
        }];
        state
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<SocialState>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(SocialState::seeded()));
    Router::new()
        .route("/user/group", get(list_groups).post(create_group))
        .route(
            "/user/group/{group_id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route(
            "/user/group/{group_id}/members",
            put(add_group_members).delete(remove_group_members),
        )
        .route("/community", get(list_communities))
        .route("/community/{community_id}", get(get_community))
        .route(
            "/community/{community_id}/entity",
            get(list_community_entities).post(upsert_community_entity),
        )
        .route(
            "/community/{community_id}/entity/{local_id}",
            get(get_community_entity),
        )
        .route("/app/{app_id}/community", post(create_community))
        .route(
            "/app/{app_id}/community/{community_id}",
            axum::routing::delete(delete_community),
        )
        .route(
            "/app/{app_id}/community/{community_id}/shared",
            get(list_shared_with_community),
        )
        .route(
            "/app/{app_id}/community/{community_id}/shared/{local_id}",
            get(get_shared_with_community),
        )
        .route(
            "/user/community/{community_id}/member",
            put(join_community).delete(leave_community),
        )
        .route("/user/{app_id}/entity", get(list_user_entities))
        .route(
            "/user/{app_id}/entity/{local_id}",
            get(get_user_entity)
                .put(update_user_entity)
                .delete(delete_user_entity),
        )
        .route(
            "/app/{app_id}/user/{user_id}/entity",
            post(upsert_user_entity_by_app),
        )
        .route(
            "/app/{app_id}/user/{user_id}/entity/{local_id}",
            put(update_user_entity_by_app),
        )
        .route(
            "/app/{app_id}/entity/{local_id}",
            axum::routing::delete(delete_entity_by_app),
        )
        .route("/app/entity/info", get(entity_info))
        .route("/user/shared", get(list_shared_with_user))
        .route(
            "/user/shared/{id}",
            get(get_visibility).put(share_entity).delete(unshare_entity),
        )
        .route("/user/shared/{id}/{local_id}", get(get_shared_with_user))
        .route("/entitytype", get(list_entity_types))
        .route(
            "/entitytype/{id}",
            get(get_entity_type).post(create_entity_type),
        )
        .route(
            "/entitytype-by-concept/{concept_id}",
            get(get_entity_type_by_concept),
        )
        .route(
            "/entitytype-by-prefix/{prefix}",
            get(list_entity_types_by_prefix),
        )
        .route("/concept", get(list_concepts))
        .route("/concept/{concept_id}", get(get_concept))
        .route(
            "/user/rating/{app_id}/{local_id}",
            post(rate_entity).get(get_rating).delete(remove_rating),
        )
        .route(
            "/user/comment/{id}",
            get(get_comment).delete(delete_comment),
        )
        .route(
            "/user/comment/{id}/{local_id}",
            post(create_comment).get(list_comments),
        )
        .route("/user/topic", get(list_topics))
        .route("/user/topic/{topic_id}", get(get_topic))
        .route("/content", get(my_contents))
        .route("/sharedcontent", post(shared_contents))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Extract the acting user from the bearer token. The reserved token
/// `forbidden` simulates an unauthorized caller.
fn bearer(headers: &HeaderMap) -> Result<String, StatusCode> {
    let value = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::FORBIDDEN)?;
    let token = value.strip_prefix("Bearer ").ok_or(StatusCode::FORBIDDEN)?;
    if token.is_empty() || token == "forbidden" {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(token.to_string())
}

fn wrap<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "data": data, "errorCode": null, "errorMessage": null }))
}

fn not_found() -> Json<Value> {
    wrap(Value::Null)
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

fn entity_uri(app_id: &str, local_id: &str) -> String {
    format!("urn:social:{app_id}:{local_id}")
}

fn visible_to(state: &SocialState, user: &str, stored: &StoredEntity) -> bool {
    let Some(visibility) = &stored.entity.visibility else {
        return false;
    };
    if visibility.is_private() {
        return false;
    }
    if visibility.all_users || visibility.all_known_users {
        return true;
    }
    if visibility.users.iter().any(|id| id == user) {
        return true;
    }
    visibility.communities.iter().any(|community_id| {
        state
            .communities
            .get(community_id)
            .is_some_and(|c| c.community.member_ids.contains(user))
    })
}

// --- groups ---

#[derive(Deserialize)]
struct NameRequest {
    name: String,
}

#[derive(Deserialize)]
struct MembersQuery {
    #[serde(rename = "userIds", default)]
    user_ids: String,
}

async fn list_groups(
    headers: HeaderMap,
    State(db): State<Db>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let mut groups: Vec<Group> = state.groups.values().cloned().collect();
    groups.sort_by_key(|group| group.social_id);
    Ok(wrap(groups))
}

async fn create_group(
    headers: HeaderMap,
    State(db): State<Db>,
    Json(input): Json<NameRequest>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let id = state.next_id();
    let group = Group {
        id: id.to_string(),
        social_id: id,
        name: input.name,
        total_members: 0,
        users: Vec::new(),
    };
    state.groups.insert(group.id.clone(), group.clone());
    Ok(wrap(group))
}

async fn get_group(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(group_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state.groups.get(&group_id).map(wrap).unwrap_or_else(not_found))
}

async fn update_group(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(group_id): Path<String>,
    Json(input): Json<Group>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    match state.groups.get_mut(&group_id) {
        Some(group) => {
            group.name = input.name;
            Ok(wrap(group.clone()))
        }
        None => Ok(not_found()),
    }
}

async fn delete_group(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(group_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    Ok(wrap(state.groups.remove(&group_id).is_some()))
}

async fn add_group_members(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(group_id): Path<String>,
    Query(query): Query<MembersQuery>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let Some(group) = state.groups.get_mut(&group_id) else {
        return Ok(wrap(false));
    };
    for user_id in query.user_ids.split(',').filter(|id| !id.is_empty()) {
        if group.users.iter().any(|u| u.user_id.as_deref() == Some(user_id)) {
            continue;
        }
        group.users.push(MinimalProfile {
            social_id: user_id.parse().unwrap_or(0),
            user_id: Some(user_id.to_string()),
            name: String::new(),
            surname: String::new(),
            known: true,
        });
    }
    group.total_members = group.users.len() as i64;
    Ok(wrap(true))
}

async fn remove_group_members(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(group_id): Path<String>,
    Query(query): Query<MembersQuery>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let Some(group) = state.groups.get_mut(&group_id) else {
        return Ok(wrap(false));
    };
    let dropped: Vec<&str> = query.user_ids.split(',').collect();
    group
        .users
        .retain(|u| !dropped.contains(&u.user_id.as_deref().unwrap_or_default()));
    group.total_members = group.users.len() as i64;
    Ok(wrap(true))
}

// --- communities ---

async fn list_communities(
    headers: HeaderMap,
    State(db): State<Db>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let mut communities: Vec<Community> = state
        .communities
        .values()
        .map(|stored| stored.community.clone())
        .collect();
    communities.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(wrap(communities))
}

async fn get_community(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(community_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .communities
        .get(&community_id)
        .map(|stored| wrap(&stored.community))
        .unwrap_or_else(not_found))
}

async fn create_community(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(app_id): Path<String>,
    Json(input): Json<Community>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let id = state.next_id();
    let community = Community {
        id: id.to_string(),
        name: input.name,
        creation_time: now_millis(),
        last_modified_time: now_millis(),
        total_members: 0,
        member_ids: BTreeSet::new(),
    };
    state.communities.insert(
        community.id.clone(),
        StoredCommunity {
            app_id,
            community: community.clone(),
        },
    );
    Ok(wrap(community))
}

async fn delete_community(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, community_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let owned = state
        .communities
        .get(&community_id)
        .is_some_and(|stored| stored.app_id == app_id);
    if !owned {
        return Ok(wrap(false));
    }
    state.communities.remove(&community_id);
    Ok(wrap(true))
}

async fn join_community(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(community_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let Some(stored) = state.communities.get_mut(&community_id) else {
        return Ok(wrap(false));
    };
    stored.community.member_ids.insert(user);
    stored.community.total_members = stored.community.member_ids.len() as i64;
    stored.community.last_modified_time = now_millis();
    Ok(wrap(true))
}

async fn leave_community(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(community_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let Some(stored) = state.communities.get_mut(&community_id) else {
        return Ok(wrap(false));
    };
    stored.community.member_ids.remove(&user);
    stored.community.total_members = stored.community.member_ids.len() as i64;
    stored.community.last_modified_time = now_millis();
    Ok(wrap(true))
}

// --- entities ---

fn refresh_entity(stored: &mut StoredEntity, mut input: Entity) {
    input.uri = stored.entity.uri.clone();
    input.creation_time = stored.entity.creation_time;
    input.last_modified_time = Some(now_millis());
    input.owner = stored.user_owner.clone();
    input.community_owner = stored.community_owner.clone();
    input.rating = stored.entity.rating;
    input.total_voters = stored.entity.total_voters;
    stored.entity = input;
}

fn insert_entity(
    state: &mut SocialState,
    app_id: &str,
    user_owner: Option<String>,
    community_owner: Option<String>,
    mut input: Entity,
) -> Option<Entity> {
    let local_id = input.local_id.clone()?;
    let key = (app_id.to_string(), local_id.clone());
    if let Some(stored) = state.entities.get_mut(&key) {
        refresh_entity(stored, input);
        return Some(stored.entity.clone());
    }
    let numeric_id = state.next_id();
    input.uri = Some(entity_uri(app_id, &local_id));
    input.owner = user_owner.clone();
    input.community_owner = community_owner.clone();
    input.creation_time = Some(now_millis());
    input.last_modified_time = input.creation_time;
    let stored = StoredEntity {
        numeric_id,
        app_id: app_id.to_string(),
        user_owner,
        community_owner,
        entity: input,
    };
    state.entities.insert(key, stored.clone());
    Some(stored.entity)
}

async fn list_user_entities(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(app_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let state = db.read().await;
    let mut entities: Vec<&StoredEntity> = state
        .entities
        .values()
        .filter(|stored| stored.app_id == app_id && stored.user_owner.as_deref() == Some(&user))
        .collect();
    entities.sort_by_key(|stored| stored.numeric_id);
    let entities: Vec<Entity> = entities.into_iter().map(|s| s.entity.clone()).collect();
    Ok(wrap(entities))
}

async fn get_user_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .entities
        .get(&(app_id, local_id))
        .filter(|stored| stored.user_owner.as_deref() == Some(&user))
        .map(|stored| wrap(&stored.entity))
        .unwrap_or_else(not_found))
}

async fn upsert_user_entity_by_app(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, user_id)): Path<(String, String)>,
    Json(input): Json<Entity>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    Ok(insert_entity(&mut state, &app_id, Some(user_id), None, input)
        .map(wrap)
        .unwrap_or_else(not_found))
}

async fn update_user_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
    Json(input): Json<Entity>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let Some(stored) = state.entities.get_mut(&(app_id, local_id)) else {
        return Ok(not_found());
    };
    if stored.user_owner.as_deref() != Some(&user) {
        return Err(StatusCode::FORBIDDEN);
    }
    refresh_entity(stored, input);
    Ok(wrap(&stored.entity))
}

async fn update_user_entity_by_app(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, user_id, local_id)): Path<(String, String, String)>,
    Json(input): Json<Entity>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let Some(stored) = state.entities.get_mut(&(app_id, local_id)) else {
        return Ok(not_found());
    };
    if stored.user_owner.as_deref() != Some(&user_id) {
        return Err(StatusCode::FORBIDDEN);
    }
    refresh_entity(stored, input);
    Ok(wrap(&stored.entity))
}

async fn delete_user_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let key = (app_id, local_id);
    let owner_matches = match state.entities.get(&key) {
        None => return Ok(wrap(false)),
        Some(stored) => stored.user_owner.as_deref() == Some(&user),
    };
    if !owner_matches {
        return Err(StatusCode::FORBIDDEN);
    }
    state.entities.remove(&key);
    Ok(wrap(true))
}

async fn delete_entity_by_app(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    Ok(wrap(state.entities.remove(&(app_id, local_id)).is_some()))
}

#[derive(Deserialize)]
struct InfoQuery {
    uri: String,
}

async fn entity_info(
    headers: HeaderMap,
    State(db): State<Db>,
    Query(query): Query<InfoQuery>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let found = state
        .entities
        .values()
        .find(|stored| stored.entity.uri.as_deref() == Some(&query.uri));
    Ok(found
        .map(|stored| {
            wrap(json!({
                "uri": stored.entity.uri,
                "localId": stored.entity.local_id,
                "appId": stored.app_id,
                "userOwner": stored.user_owner,
                "communityOwner": stored.community_owner,
            }))
        })
        .unwrap_or_else(not_found))
}

async fn list_community_entities(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(community_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let mut entities: Vec<&StoredEntity> = state
        .entities
        .values()
        .filter(|stored| stored.community_owner.as_deref() == Some(&community_id))
        .collect();
    entities.sort_by_key(|stored| stored.numeric_id);
    let entities: Vec<Entity> = entities.into_iter().map(|s| s.entity.clone()).collect();
    Ok(wrap(entities))
}

async fn get_community_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((community_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .entities
        .values()
        .find(|stored| {
            stored.community_owner.as_deref() == Some(&community_id)
                && stored.entity.local_id.as_deref() == Some(&local_id)
        })
        .map(|stored| wrap(&stored.entity))
        .unwrap_or_else(not_found))
}

async fn upsert_community_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(community_id): Path<String>,
    Json(input): Json<Entity>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let Some(app_id) = state
        .communities
        .get(&community_id)
        .map(|stored| stored.app_id.clone())
    else {
        return Ok(not_found());
    };
    Ok(
        insert_entity(&mut state, &app_id, None, Some(community_id), input)
            .map(wrap)
            .unwrap_or_else(not_found),
    )
}

// --- sharing ---

async fn share_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(local_id): Path<String>,
    Json(input): Json<Visibility>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let Some(stored) = state
        .entities
        .values_mut()
        .find(|stored| {
            stored.user_owner.as_deref() == Some(&user)
                && stored.entity.local_id.as_deref() == Some(&local_id)
        })
    else {
        return Ok(wrap(false));
    };
    stored.entity.visibility = Some(input);
    stored.entity.last_modified_time = Some(now_millis());
    Ok(wrap(true))
}

async fn unshare_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(local_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let Some(stored) = state
        .entities
        .values_mut()
        .find(|stored| {
            stored.user_owner.as_deref() == Some(&user)
                && stored.entity.local_id.as_deref() == Some(&local_id)
        })
    else {
        return Ok(wrap(false));
    };
    stored.entity.visibility = None;
    stored.entity.last_modified_time = Some(now_millis());
    Ok(wrap(true))
}

async fn get_visibility(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(local_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .entities
        .values()
        .find(|stored| {
            stored.user_owner.as_deref() == Some(&user)
                && stored.entity.local_id.as_deref() == Some(&local_id)
        })
        .and_then(|stored| stored.entity.visibility.as_ref())
        .map(wrap)
        .unwrap_or_else(not_found))
}

async fn list_shared_with_user(
    headers: HeaderMap,
    State(db): State<Db>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let state = db.read().await;
    let mut shared: Vec<&StoredEntity> = state
        .entities
        .values()
        .filter(|stored| {
            stored.user_owner.as_deref() != Some(&user) && visible_to(&state, &user, stored)
        })
        .collect();
    shared.sort_by_key(|stored| stored.numeric_id);
    let entities: Vec<Entity> = shared.into_iter().map(|s| s.entity.clone()).collect();
    Ok(wrap(entities))
}

async fn get_shared_with_user(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .entities
        .get(&(app_id, local_id))
        .filter(|stored| visible_to(&state, &user, stored))
        .map(|stored| wrap(&stored.entity))
        .unwrap_or_else(not_found))
}

async fn list_shared_with_community(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, community_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let mut shared: Vec<&StoredEntity> = state
        .entities
        .values()
        .filter(|stored| {
            stored.app_id == app_id
                && stored
                    .entity
                    .visibility
                    .as_ref()
                    .is_some_and(|v| v.communities.iter().any(|id| id == &community_id))
        })
        .collect();
    shared.sort_by_key(|stored| stored.numeric_id);
    let entities: Vec<Entity> = shared.into_iter().map(|s| s.entity.clone()).collect();
    Ok(wrap(entities))
}

async fn get_shared_with_community(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, community_id, local_id)): Path<(String, String, String)>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .entities
        .get(&(app_id, local_id))
        .filter(|stored| {
            stored
                .entity
                .visibility
                .as_ref()
                .is_some_and(|v| v.communities.iter().any(|id| id == &community_id))
        })
        .map(|stored| wrap(&stored.entity))
        .unwrap_or_else(not_found))
}

// --- legacy content listings ---

#[derive(Deserialize)]
struct WindowQuery {
    #[serde(default)]
    position: Option<i64>,
    #[serde(default)]
    size: Option<i64>,
    #[serde(default, rename = "type")]
    type_id: Option<String>,
}

fn window<'a>(
    mut entities: Vec<&'a StoredEntity>,
    query: &WindowQuery,
) -> Vec<&'a StoredEntity> {
    entities.sort_by_key(|stored| stored.numeric_id);
    if let Some(type_id) = query.type_id.as_deref().filter(|t| !t.is_empty()) {
        entities.retain(|stored| stored.entity.entity_type == type_id);
    }
    let position = query.position.unwrap_or(-1);
    if position > 0 {
        entities = entities.split_off((position as usize).min(entities.len()));
    }
    let size = query.size.unwrap_or(-1);
    if size >= 0 {
        entities.truncate(size as usize);
    }
    entities
}

fn to_shared_content(stored: &StoredEntity) -> Value {
    json!({
        "entityId": stored.numeric_id,
        "title": stored.entity.name,
        "entityType": stored.entity.entity_type,
        "tags": stored.entity.tags.iter().map(|tag| tag.name.clone()).collect::<Vec<_>>(),
        "ownerId": 0,
        "creationDate": stored.entity.creation_time,
    })
}

async fn my_contents(
    headers: HeaderMap,
    State(db): State<Db>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let state = db.read().await;
    let mine: Vec<&StoredEntity> = state
        .entities
        .values()
        .filter(|stored| stored.user_owner.as_deref() == Some(&user))
        .collect();
    let contents: Vec<Value> = window(mine, &query)
        .into_iter()
        .map(to_shared_content)
        .collect();
    Ok(wrap(contents))
}

async fn shared_contents(
    headers: HeaderMap,
    State(db): State<Db>,
    Query(query): Query<WindowQuery>,
    Json(_sources): Json<Visibility>,
) -> Result<Json<Value>, StatusCode> {
    // Source filtering is not modeled; everything visible to the caller
    // is returned.
    let user = bearer(&headers)?;
    let state = db.read().await;
    let shared: Vec<&StoredEntity> = state
        .entities
        .values()
        .filter(|stored| {
            stored.user_owner.as_deref() != Some(&user) && visible_to(&state, &user, stored)
        })
        .collect();
    let contents: Vec<Value> = window(shared, &query)
        .into_iter()
        .map(to_shared_content)
        .collect();
    Ok(wrap(contents))
}

// --- entity types and concepts ---

async fn list_entity_types(
    headers: HeaderMap,
    State(db): State<Db>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let mut types: Vec<EntityType> = state.entity_types.values().cloned().collect();
    types.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(wrap(types))
}

async fn get_entity_type(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state.entity_types.get(&id).map(wrap).unwrap_or_else(not_found))
}

async fn create_entity_type(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(concept_id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let mut state = db.write().await;
    let Some(concept) = state
        .concepts
        .iter()
        .find(|concept| concept.id == Some(concept_id))
        .cloned()
    else {
        return Ok(not_found());
    };
    if let Some(existing) = state
        .entity_types
        .values()
        .find(|t| t.concept.as_ref().and_then(|c| c.id) == Some(concept_id))
    {
        return Ok(wrap(existing.clone()));
    }
    let id = state.next_id();
    let entity_type = EntityType {
        id: id.to_string(),
        name: concept.name.clone(),
        concept: Some(concept),
    };
    state
        .entity_types
        .insert(entity_type.id.clone(), entity_type.clone());
    Ok(wrap(entity_type))
}

async fn get_entity_type_by_concept(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(concept_id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .entity_types
        .values()
        .find(|t| t.concept.as_ref().and_then(|c| c.id) == Some(concept_id))
        .map(wrap)
        .unwrap_or_else(not_found))
}

#[derive(Deserialize)]
struct PrefixQuery {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(rename = "maxResults", default)]
    max_results: Option<usize>,
}

async fn list_entity_types_by_prefix(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(prefix): Path<String>,
    Query(query): Query<PrefixQuery>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let mut types: Vec<EntityType> = state
        .entity_types
        .values()
        .filter(|t| t.name.starts_with(&prefix))
        .cloned()
        .collect();
    types.sort_by(|a, b| a.id.cmp(&b.id));
    types.truncate(query.max_results.unwrap_or(20));
    Ok(wrap(types))
}

async fn list_concepts(
    headers: HeaderMap,
    State(db): State<Db>,
    Query(query): Query<PrefixQuery>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let prefix = query.prefix.unwrap_or_default();
    let mut concepts: Vec<Concept> = state
        .concepts
        .iter()
        .filter(|concept| concept.name.starts_with(&prefix))
        .cloned()
        .collect();
    concepts.truncate(query.max_results.unwrap_or(20));
    Ok(wrap(concepts))
}

async fn get_concept(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(concept_id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .concepts
        .iter()
        .find(|concept| concept.id == Some(concept_id))
        .map(wrap)
        .unwrap_or_else(not_found))
}

// --- ratings and comments ---

#[derive(Deserialize)]
struct RatingRequest {
    rating: f64,
}

fn refresh_rating(state: &mut SocialState, app_id: &str, local_id: &str) {
    let votes: Vec<f64> = state
        .ratings
        .iter()
        .filter(|((_, app, local), _)| app == app_id && local == local_id)
        .map(|(_, value)| *value)
        .collect();
    if let Some(stored) = state
        .entities
        .get_mut(&(app_id.to_string(), local_id.to_string()))
    {
        stored.entity.total_voters = votes.len() as i64;
        stored.entity.rating = if votes.is_empty() {
            0.0
        } else {
            votes.iter().sum::<f64>() / votes.len() as f64
        };
    }
}

async fn rate_entity(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
    Json(input): Json<RatingRequest>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    if !state.entities.contains_key(&(app_id.clone(), local_id.clone())) {
        return Ok(wrap(false));
    }
    state
        .ratings
        .insert((user, app_id.clone(), local_id.clone()), input.rating);
    refresh_rating(&mut state, &app_id, &local_id);
    Ok(wrap(true))
}

async fn get_rating(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .ratings
        .get(&(user.clone(), app_id.clone(), local_id.clone()))
        .map(|value| {
            wrap(json!({
                "userId": user,
                "entityURI": entity_uri(&app_id, &local_id),
                "rating": value,
            }))
        })
        .unwrap_or_else(not_found))
}

async fn remove_rating(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let removed = state
        .ratings
        .remove(&(user, app_id.clone(), local_id.clone()))
        .is_some();
    refresh_rating(&mut state, &app_id, &local_id);
    Ok(wrap(removed))
}

#[derive(Deserialize)]
struct CommentRequest {
    text: String,
}

async fn create_comment(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
    Json(input): Json<CommentRequest>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        text: input.text,
        author: user,
        app_id,
        local_id,
        creation_time: now_millis(),
        deleted: false,
    };
    state.comments.insert(comment.id.clone(), comment.clone());
    Ok(wrap(comment))
}

async fn list_comments(
    headers: HeaderMap,
    State(db): State<Db>,
    Path((app_id, local_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    let mut comments: Vec<Comment> = state
        .comments
        .values()
        .filter(|comment| {
            comment.app_id == app_id && comment.local_id == local_id && !comment.deleted
        })
        .cloned()
        .collect();
    comments.sort_by_key(|comment| comment.creation_time);
    Ok(wrap(comments))
}

async fn get_comment(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(comment_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .comments
        .get(&comment_id)
        .map(wrap)
        .unwrap_or_else(not_found))
}

async fn delete_comment(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(comment_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let user = bearer(&headers)?;
    let mut state = db.write().await;
    match state.comments.get_mut(&comment_id) {
        Some(comment) if comment.author == user => {
            comment.deleted = true;
            Ok(wrap(true))
        }
        Some(_) => Err(StatusCode::FORBIDDEN),
        None => Ok(wrap(false)),
    }
}

// --- topics ---

async fn list_topics(
    headers: HeaderMap,
    State(db): State<Db>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(wrap(&state.topics))
}

async fn get_topic(
    headers: HeaderMap,
    State(db): State<Db>,
    Path(topic_id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    bearer(&headers)?;
    let state = db.read().await;
    Ok(state
        .topics
        .iter()
        .find(|topic| topic.social_id == topic_id)
        .map(wrap)
        .unwrap_or_else(not_found))
}
