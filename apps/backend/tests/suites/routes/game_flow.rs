use actix_web::test;
use serde_json::{json, Value};

use crate::common::{opponent_character_ids, own_bonus_ids, own_character_ids};
use crate::support::{build_test_state, create_test_app};

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri(&$uri)
            .set_json($body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn full_duel_over_http() {
    let state = build_test_state();
    let app = create_test_app(state.clone()).await;

    // Alice opens a session.
    let resp = post_json!(app, "/api/games".to_string(), json!({"player_id": "alice", "name": "Alice"}));
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = test::read_body_json(resp).await;
    let session_id = created["session_id"].as_str().unwrap().to_string();
    assert_eq!(session_id.len(), 6);
    assert_eq!(created["snapshot"]["status"], "Waiting");
    assert!(created["snapshot"]["opponent"].is_null());

    // Bob joins: Playing, Alice to move.
    let resp = post_json!(
        app,
        format!("/api/games/{session_id}/join"),
        json!({"player_id": "bob", "name": "Bob"})
    );
    assert_eq!(resp.status().as_u16(), 200);
    let bob: Value = test::read_body_json(resp).await;
    assert_eq!(bob["status"], "Playing");
    assert_eq!(bob["your_slot"], "B");
    assert_eq!(bob["is_your_turn"], false);
    assert_eq!(bob["opponent"]["bonus_hand_count"], 5);
    assert!(bob["opponent"].get("bonus_hand").is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{session_id}?player_id=alice"))
        .to_request();
    let alice: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(alice["is_your_turn"], true);
    assert_eq!(alice["round_number"], 1);

    let attacker = own_character_ids(&alice)[0].clone();
    let target = opponent_character_ids(&alice)[0].clone();
    let bonus = own_bonus_ids(&alice)[0].clone();

    // +10% on a 10-attack character: 11 damage.
    let resp = post_json!(
        app,
        format!("/api/games/{session_id}/bonus"),
        json!({"player_id": "alice", "bonus_card_id": bonus, "target_id": attacker})
    );
    assert_eq!(resp.status().as_u16(), 200);
    let boosted: Value = test::read_body_json(resp).await;
    assert_eq!(boosted["bonus_target_this_turn"], attacker.as_str());
    assert_eq!(own_bonus_ids(&boosted).len(), 4);

    let resp = post_json!(
        app,
        format!("/api/games/{session_id}/attack"),
        json!({"player_id": "alice", "attacker_id": attacker, "target_id": target})
    );
    assert_eq!(resp.status().as_u16(), 200);
    let after: Value = test::read_body_json(resp).await;
    let hit = after["opponent"]["characters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == target.as_str())
        .unwrap()
        .clone();
    assert_eq!(hit["health"], 19);

    let resp = post_json!(
        app,
        format!("/api/games/{session_id}/select"),
        json!({"player_id": "alice", "character_id": attacker})
    );
    assert_eq!(resp.status().as_u16(), 200);

    let resp = post_json!(
        app,
        format!("/api/games/{session_id}/end-turn"),
        json!({"player_id": "alice"})
    );
    assert_eq!(resp.status().as_u16(), 200);
    let ended: Value = test::read_body_json(resp).await;
    assert_eq!(ended["turn_owner"], "B");
    assert_eq!(ended["round_number"], 2);
    assert!(ended["bonus_target_this_turn"].is_null());

    let resp = post_json!(
        app,
        format!("/api/games/{session_id}/forfeit"),
        json!({"player_id": "bob"})
    );
    let finished: Value = test::read_body_json(resp).await;
    assert_eq!(finished["status"], "Finished");
    assert_eq!(finished["winner"], "A");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/games/{session_id}?player_id=alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);
    assert_eq!(state.flow.session_count(), 0);
}

#[actix_web::test]
async fn rejoin_by_a_seated_player_returns_their_view() {
    let app = create_test_app(build_test_state()).await;

    let resp = post_json!(app, "/api/games".to_string(), json!({"player_id": "alice", "name": "Alice"}));
    let created: Value = test::read_body_json(resp).await;
    let session_id = created["session_id"].as_str().unwrap().to_string();

    let resp = post_json!(
        app,
        format!("/api/games/{session_id}/join"),
        json!({"player_id": "alice", "name": "Alice"})
    );
    assert_eq!(resp.status().as_u16(), 200);
    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["your_slot"], "A");
    assert_eq!(view["status"], "Waiting");
}
