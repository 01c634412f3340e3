//! Domain DTOs for the social service API.
//!
//! # Design
//! Plain data records mirroring the server's JSON shapes, defined
//! independently from the mock-server crate; integration tests catch any
//! schema drift. Every struct decodes tolerantly (`serde(default)`) so a
//! payload missing optional fields still produces a value, and unset
//! optional fields are omitted on encode rather than sent as empty
//! placeholders. Lists always decode by actual array length.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Canonical URI the server assigns to an entity owned through an app.
///
/// Useful to pre-validate an entity fetched under one `(appId, localId)`
/// pair before sending it back on an update.
pub fn entity_uri(app_id: &str, local_id: &str) -> String {
    format!("urn:social:{app_id}:{local_id}")
}

/// Reduced profile of a user, as embedded in groups and topics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MinimalProfile {
    pub social_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    pub known: bool,
}

/// A user-defined group of profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub social_id: i64,
    pub name: String,
    pub total_members: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<MinimalProfile>,
}

/// A community users can join; owned by an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Community {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<i64>,
    pub total_members: i64,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub member_ids: BTreeSet<String>,
}

/// A generic content object (event, portfolio, story, ...) identified by
/// owner + local id, or globally by `uri`.
///
/// The server populates `uri`, `rating`, `totalVoters` and the timestamps;
/// callers set the remaining fields before create/update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_uri: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_owner: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Concept>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<String>,
    pub rating: f64,
    pub total_voters: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ShareVisibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<i64>,
}

/// Resolution record for an entity URI lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_owner: Option<String>,
}

/// A type of entity, classified by a concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<Concept>,
}

/// A semantic tag drawn from the shared vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
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

/// Who can see a shared entity: broad flags plus explicit id lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShareVisibility {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub communities: Vec<String>,
    pub all_users: bool,
    pub all_known_users: bool,
    pub all_communities: bool,
    pub all_known_communities: bool,
}

impl ShareVisibility {
    /// Visibility limited to the given communities.
    pub fn for_communities<I: IntoIterator<Item = String>>(ids: I) -> Self {
        ShareVisibility {
            communities: ids.into_iter().collect(),
            ..ShareVisibility::default()
        }
    }

    /// Visibility limited to the given users.
    pub fn for_users<I: IntoIterator<Item = String>>(ids: I) -> Self {
        ShareVisibility {
            users: ids.into_iter().collect(),
            ..ShareVisibility::default()
        }
    }
}

/// Denormalized view of an entity as it appears in share listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SharedContent {
    pub entity_id: i64,
    pub title: String,
    pub entity_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub owner_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<MinimalProfile>,
}

/// Lifecycle state of a followed topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicStatus {
    #[default]
    Active,
    Suspended,
}

/// A followed subject with source filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Topic {
    pub social_id: i64,
    pub name: String,
    pub status: TopicStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<Concept>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<MinimalProfile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub communities: Vec<Community>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content_types: Vec<String>,
    pub all_users: bool,
    pub all_known_users: bool,
    pub all_communities: bool,
    pub all_known_communities: bool,
}

/// A user's rating of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "entityURI", skip_serializing_if = "Option::is_none")]
    pub entity_uri: Option<String>,
    pub rating: f64,
}

/// A user's comment on an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    pub deleted: bool,
}

/// Pagination/sort/date-range filter for list reads, translated into
/// query parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Limit {
    pub page: i64,
    pub page_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<i64>,
    /// 0 ascending, 1 descending.
    pub direction: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort_list: Vec<String>,
}

impl Limit {
    /// Translate into query parameters, in a fixed order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("pageNum", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(from) = self.from_date {
            params.push(("fromDate", from.to_string()));
        }
        if let Some(to) = self.to_date {
            params.push(("toDate", to.to_string()));
        }
        params.push(("sortDirection", self.direction.to_string()));
        if !self.sort_list.is_empty() {
            params.push(("sortList", self.sort_list.join(",")));
        }
        params
    }
}
