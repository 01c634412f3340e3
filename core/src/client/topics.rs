//! Request builders for topics.

use crate::http::{seg, HttpRequest};

use super::SocialClient;

impl SocialClient {
    /// GET `user/topic` — all topics of the calling user.
    pub fn build_get_topics(&self, token: &str) -> HttpRequest {
        self.get(token, "user/topic".to_string())
    }

    /// GET `user/topic/{topicId}`.
    pub fn build_get_topic(&self, token: &str, topic_id: &str) -> HttpRequest {
        self.get(token, format!("user/topic/{}", seg(topic_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::types::{Topic, TopicStatus};

    #[test]
    fn topic_paths() {
        let req = client().build_get_topics("tok");
        assert_eq!(req.path, "http://localhost:3000/user/topic");

        let req = client().build_get_topic("tok", "t1");
        assert_eq!(req.path, "http://localhost:3000/user/topic/t1");
    }

    #[test]
    fn topic_payload_decodes_status() {
        let topic: Topic = client()
            .parse_object(ok(
                r#"{"data":{"socialId":5,"name":"news","status":"SUSPENDED"}}"#,
            ))
            .unwrap()
            .unwrap();
        assert_eq!(topic.status, TopicStatus::Suspended);
    }
}
