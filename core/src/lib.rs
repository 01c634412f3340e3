//! Client SDK for the social service REST API.
//!
//! # Overview
//! Every public operation maps one-to-one onto a REST endpoint of the
//! social service backend (groups, communities, entities, sharing,
//! entity types/concepts, ratings, comments, topics): build a path,
//! serialize a JSON body, send it with a bearer token, decode the JSON
//! answer into a plain data object. There is no client-side state,
//! caching, or retry logic.
//!
//! # Design
//! - `SocialClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network, so the whole wire contract is
//!   testable against stubs.
//! - `Transport` executes requests over ureq with a fixed timeout;
//!   `SocialService` composes the two into a blocking one-method-per-
//!   endpoint façade.
//! - Server responses may arrive bare or wrapped in the
//!   `{data, errorCode, errorMessage}` envelope; both decode through the
//!   same path. `DecodePolicy` controls whether an undecodable payload
//!   reads as "not found" (default) or as an error.

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use client::SocialClient;
pub use envelope::DecodePolicy;
pub use error::SocialError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::SocialService;
pub use transport::{Transport, HTTP_REQUEST_TIMEOUT};
pub use types::{
    entity_uri, Comment, Community, Concept, Entity, EntityInfo, EntityType, Group, Limit,
    MinimalProfile, Rating, ShareVisibility, SharedContent, Topic, TopicStatus,
};
