//! Full lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the blocking
//! `SocialService` façade over real HTTP: groups, communities, entity
//! types, entities, sharing, legacy content listings, ratings, comments
//! and topics. Tokens double as user ids on the mock side.

use social_core::{
    Community, Entity, ShareVisibility, SocialError, SocialService,
};

const USER: &str = "alice";
const OTHER: &str = "bob";
const CLIENT: &str = "app-client";
const APP: &str = "app1";

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn social_service_lifecycle() {
    let service = SocialService::new(&start_server());

    // Step 1: groups.
    assert!(service.get_user_groups(USER).unwrap().is_empty());

    let group = service.create_user_group(USER, "friends").unwrap().unwrap();
    let group_id = group.id.clone().unwrap();
    assert_eq!(group.name, "friends");
    assert_eq!(service.get_user_groups(USER).unwrap().len(), 1);

    let mut renamed = group.clone();
    renamed.name = "friends MOD".to_string();
    let updated = service.update_user_group(USER, &renamed).unwrap().unwrap();
    assert_eq!(updated.name, "friends MOD");

    assert!(service
        .add_users_to_group(USER, &group_id, &["7".to_string()])
        .unwrap());
    let fetched = service.get_user_group(USER, &group_id).unwrap().unwrap();
    assert_eq!(fetched.total_members, 1);

    assert!(service
        .remove_users_from_group(USER, &group_id, &["7".to_string()])
        .unwrap());
    let fetched = service.get_user_group(USER, &group_id).unwrap().unwrap();
    assert_eq!(fetched.total_members, 0);

    assert!(service.delete_user_group(USER, &group_id).unwrap());
    assert!(service.get_user_group(USER, &group_id).unwrap().is_none());

    // Step 2: communities.
    let community = Community {
        name: "commuters".to_string(),
        ..Community::default()
    };
    let community = service
        .create_community(CLIENT, APP, &community)
        .unwrap()
        .unwrap();
    let community_id = community.id.clone().unwrap();

    assert!(service.add_user_to_community(USER, &community_id).unwrap());
    let joined = service.get_community(USER, &community_id).unwrap().unwrap();
    assert_eq!(joined.total_members, 1);
    assert!(joined.member_ids.contains(USER));
    assert_eq!(service.get_communities(USER, None).unwrap().len(), 1);

    // Step 3: entity types from the seeded concept vocabulary.
    let entity_type = service.create_entity_type(USER, 1).unwrap().unwrap();
    let type_id = entity_type.id.clone().unwrap();
    assert_eq!(entity_type.concept.as_ref().unwrap().id, Some(1));

    assert!(service.get_entity_type(USER, &type_id).unwrap().is_some());
    assert_eq!(service.get_entity_types(USER, None).unwrap().len(), 1);
    assert!(service
        .get_entity_type_by_concept(USER, 1)
        .unwrap()
        .is_some());
    assert_eq!(
        service
            .get_entity_types_by_prefix(USER, "e", None)
            .unwrap()
            .len(),
        1
    );
    // Seeded concepts starting with "e": event, experience.
    assert_eq!(
        service
            .get_concepts_by_prefix(USER, "e", Some(10))
            .unwrap()
            .len(),
        2
    );
    assert!(service.get_concept(USER, 1).unwrap().is_some());
    assert!(service.get_concept(USER, 99).unwrap().is_none());

    // Step 4: user entities.
    let draft = Entity {
        local_id: Some("e1".to_string()),
        name: "my event".to_string(),
        entity_type: type_id.clone(),
        ..Entity::default()
    };
    let created = service
        .create_or_update_user_entity_by_app(CLIENT, APP, USER, &draft)
        .unwrap()
        .unwrap();
    assert_eq!(created.uri.as_deref(), Some("urn:social:app1:e1"));
    assert_eq!(created.owner.as_deref(), Some(USER));

    assert_eq!(service.get_user_entities(USER, APP, None).unwrap().len(), 1);
    assert!(service.get_user_entity(USER, APP, "nope").unwrap().is_none());

    let mut renamed = created.clone();
    renamed.name = "renamed event".to_string();
    let updated = service
        .update_user_entity_by_user(USER, APP, &renamed)
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "renamed event");

    let mut stale = created.clone();
    stale.uri = Some("dummie".to_string());
    let err = service
        .update_user_entity_by_user(USER, APP, &stale)
        .unwrap_err();
    assert!(matches!(err, SocialError::InvalidArgument(_)));

    let info = service
        .get_entity_info_by_app(CLIENT, "urn:social:app1:e1")
        .unwrap()
        .unwrap();
    assert_eq!(info.app_id.as_deref(), Some(APP));
    assert_eq!(info.user_owner.as_deref(), Some(USER));
    assert!(service
        .get_entity_info_by_app(CLIENT, "dummie")
        .unwrap()
        .is_none());

    // Step 5: sharing with everyone.
    let everyone = ShareVisibility {
        all_users: true,
        ..ShareVisibility::default()
    };
    assert!(service.share_user_entity(USER, "e1", &everyone).unwrap());
    let visibility = service
        .get_share_visibility(USER, "e1")
        .unwrap()
        .unwrap();
    assert!(visibility.all_users);

    let shared = service.get_entities_shared_with_user(OTHER, None).unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].name, "renamed event");
    assert!(service
        .get_entity_shared_with_user(OTHER, APP, "e1")
        .unwrap()
        .is_some());

    let contents = service
        .get_shared_contents(OTHER, &ShareVisibility::default(), None, None, None)
        .unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].title, "renamed event");

    let mine = service.get_my_contents(USER, None, None, None).unwrap();
    assert_eq!(mine.len(), 1);

    assert!(service.unshare_user_entity(USER, "e1").unwrap());
    assert!(service
        .get_entities_shared_with_user(OTHER, None)
        .unwrap()
        .is_empty());
    assert!(service
        .get_entity_shared_with_user(OTHER, APP, "e1")
        .unwrap()
        .is_none());

    // Step 6: sharing with a community.
    let to_community = ShareVisibility::for_communities([community_id.clone()]);
    assert!(service.share_user_entity(USER, "e1", &to_community).unwrap());
    let shared = service
        .get_entities_shared_with_community(CLIENT, APP, &community_id, None)
        .unwrap();
    assert_eq!(shared.len(), 1);
    assert!(service
        .get_entity_shared_with_community(CLIENT, APP, &community_id, "e1")
        .unwrap()
        .is_some());
    // Sharing with a community reaches members only; bob is not one.
    assert!(service
        .get_entities_shared_with_user(OTHER, None)
        .unwrap()
        .is_empty());

    // Step 7: community entities.
    let communal = Entity {
        local_id: Some("e2".to_string()),
        name: "community journal".to_string(),
        entity_type: type_id.clone(),
        visibility: Some(ShareVisibility::for_users([OTHER.to_string()])),
        ..Entity::default()
    };
    let communal = service
        .create_or_update_community_entity(CLIENT, &community_id, &communal)
        .unwrap()
        .unwrap();
    assert_eq!(communal.community_owner.as_deref(), Some(community_id.as_str()));

    assert_eq!(
        service
            .get_community_entities(CLIENT, &community_id, None)
            .unwrap()
            .len(),
        1
    );
    assert!(service
        .get_community_entity(CLIENT, &community_id, "e2")
        .unwrap()
        .is_some());
    let shared_with_other = service.get_entities_shared_with_user(OTHER, None).unwrap();
    assert_eq!(shared_with_other.len(), 1);
    assert_eq!(shared_with_other[0].name, "community journal");

    // Step 8: access control.
    let err = service.delete_entity_by_user(OTHER, APP, "e1").unwrap_err();
    assert!(matches!(err, SocialError::AccessDenied));
    let err = service.get_user_groups("forbidden").unwrap_err();
    assert!(matches!(err, SocialError::AccessDenied));

    // Step 9: ratings.
    assert!(service.rate_entity_by_user(OTHER, APP, "e1", 2.0).unwrap());
    let rating = service
        .get_rating_by_user(OTHER, APP, "e1")
        .unwrap()
        .unwrap();
    assert_eq!(rating.rating, 2.0);
    let rated = service.get_user_entity(USER, APP, "e1").unwrap().unwrap();
    assert_eq!(rated.total_voters, 1);
    assert_eq!(rated.rating, 2.0);

    assert!(service.remove_rating_by_user(OTHER, APP, "e1").unwrap());
    assert!(service.get_rating_by_user(OTHER, APP, "e1").unwrap().is_none());

    // Step 10: comments.
    let comment = service
        .create_comment(OTHER, "my comment", APP, "e1")
        .unwrap()
        .unwrap();
    let comment_id = comment.id.clone().unwrap();
    assert_eq!(comment.text, "my comment");

    let comments = service
        .get_comments_by_entity(USER, APP, "e1", None)
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert!(service.get_comment(USER, &comment_id).unwrap().is_some());

    assert!(service.delete_comment(OTHER, &comment_id).unwrap());
    assert!(service
        .get_comments_by_entity(USER, APP, "e1", None)
        .unwrap()
        .is_empty());

    // Step 11: topics are seeded read-only.
    let topics = service.get_topics(USER).unwrap();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].name, "announcements");
    assert!(service.get_topic(USER, "1").unwrap().is_some());
    assert!(service.get_topic(USER, "99").unwrap().is_none());

    // Step 12: deletes.
    assert!(service.delete_entity_by_app(CLIENT, APP, "e1").unwrap());
    assert!(service.get_user_entity(USER, APP, "e1").unwrap().is_none());
    assert!(!service.delete_entity_by_app(CLIENT, APP, "e1").unwrap());

    assert!(service.delete_entity_by_app(CLIENT, APP, "e2").unwrap());
    assert!(service
        .delete_community(CLIENT, APP, &community_id)
        .unwrap());
    assert!(service.get_community(USER, &community_id).unwrap().is_none());
}
