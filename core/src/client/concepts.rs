//! Request builders for entity types and the concept vocabulary.

use crate::http::{seg, HttpMethod, HttpRequest};
use crate::types::Limit;

use super::SocialClient;

impl SocialClient {
    /// GET `entitytype`.
    pub fn build_get_entity_types(&self, token: &str, limit: Option<&Limit>) -> HttpRequest {
        self.get_with(
            token,
            "entitytype".to_string(),
            limit.map(Limit::to_query).unwrap_or_default(),
        )
    }

    /// GET `entitytype/{entityTypeId}`.
    pub fn build_get_entity_type(&self, token: &str, entity_type_id: &str) -> HttpRequest {
        self.get(token, format!("entitytype/{}", seg(entity_type_id)))
    }

    /// POST `entitytype/{conceptId}` — create the entity type bound to a
    /// concept. The server derives the type name from the concept.
    pub fn build_create_entity_type(&self, token: &str, concept_id: i64) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            token,
            format!("entitytype/{concept_id}"),
            Vec::new(),
            None,
        )
    }

    /// GET `entitytype-by-concept/{conceptId}`.
    pub fn build_get_entity_type_by_concept(&self, token: &str, concept_id: i64) -> HttpRequest {
        self.get(token, format!("entitytype-by-concept/{concept_id}"))
    }

    /// GET `entitytype-by-prefix/{prefix}?maxResults=..`.
    pub fn build_get_entity_types_by_prefix(
        &self,
        token: &str,
        prefix: &str,
        max_results: Option<u32>,
    ) -> HttpRequest {
        self.get_with(
            token,
            format!("entitytype-by-prefix/{}", seg(prefix)),
            max_results
                .map(|max| vec![("maxResults", max.to_string())])
                .unwrap_or_default(),
        )
    }

    /// GET `concept?prefix=..&maxResults=..` — tag suggestions.
    pub fn build_get_concepts_by_prefix(
        &self,
        token: &str,
        prefix: &str,
        max_results: Option<u32>,
    ) -> HttpRequest {
        let mut query = vec![("prefix", prefix.to_string())];
        if let Some(max) = max_results {
            query.push(("maxResults", max.to_string()));
        }
        self.get_with(token, "concept".to_string(), query)
    }

    /// GET `concept/{conceptId}`.
    pub fn build_get_concept(&self, token: &str, concept_id: i64) -> HttpRequest {
        self.get(token, format!("concept/{concept_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::http::HttpMethod;

    #[test]
    fn entity_type_paths() {
        let req = client().build_get_entity_types("tok", None);
        assert_eq!(req.path, "http://localhost:3000/entitytype");

        let req = client().build_get_entity_type("tok", "t1");
        assert_eq!(req.path, "http://localhost:3000/entitytype/t1");

        let req = client().build_create_entity_type("tok", 42);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/entitytype/42");
        assert!(req.body.is_none());

        let req = client().build_get_entity_type_by_concept("tok", 42);
        assert_eq!(req.path, "http://localhost:3000/entitytype-by-concept/42");
    }

    #[test]
    fn prefix_search_encodes_prefix_segment() {
        let req = client().build_get_entity_types_by_prefix("tok", "città", Some(10));
        assert_eq!(
            req.path,
            "http://localhost:3000/entitytype-by-prefix/citt%C3%A0?maxResults=10"
        );

        let req = client().build_get_entity_types_by_prefix("tok", "event", None);
        assert_eq!(req.path, "http://localhost:3000/entitytype-by-prefix/event");
    }

    #[test]
    fn concept_suggestion_query() {
        let req = client().build_get_concepts_by_prefix("tok", "mus", Some(20));
        assert_eq!(
            req.path,
            "http://localhost:3000/concept?prefix=mus&maxResults=20"
        );

        let req = client().build_get_concept("tok", 7);
        assert_eq!(req.path, "http://localhost:3000/concept/7");
    }
}
