use std::time::Duration;

use serde_json::{json, Value};

use crate::common::{opponent_character_ids, own_character_ids};
use crate::support::build_test_state;
use crate::support::websocket::{start_test_server, wait_for_connections, ws_url};
use crate::support::websocket_client::WebSocketClient;

const QUIET: Duration = Duration::from_millis(200);

async fn connect(
    addr: std::net::SocketAddr,
    player: &str,
) -> Result<WebSocketClient, Box<dyn std::error::Error>> {
    let mut client =
        WebSocketClient::connect_retry(&ws_url(addr, player), Duration::from_secs(1)).await?;
    client.hello().await?;
    Ok(client)
}

/// Alice creates over her socket and Bob joins over his; both receive the
/// Playing snapshot. Returns the session id and Alice's pushed view.
async fn start_duel(
    alice: &mut WebSocketClient,
    bob: &mut WebSocketClient,
) -> Result<(String, Value), Box<dyn std::error::Error>> {
    alice
        .send_json(&json!({"type": "create_game", "name": "Alice"}))
        .await?;
    let created = alice.expect("game_created").await?;
    let session_id = created["session_id"].as_str().unwrap().to_string();

    bob.send_json(&json!({"type": "join_game", "session_id": session_id, "name": "Bob"}))
        .await?;
    let bob_view = bob.expect("game_state").await?;
    assert_eq!(bob_view["snapshot"]["your_slot"], "B");

    let alice_view = alice.expect("game_state").await?;
    assert_eq!(alice_view["snapshot"]["status"], "Playing");
    assert_eq!(alice_view["snapshot"]["is_your_turn"], true);
    Ok((session_id, alice_view["snapshot"].clone()))
}

#[tokio::test]
async fn attack_is_pushed_to_both_players() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state();
    let registry = state.registry.clone();
    let (server_handle, addr, server_join) = start_test_server(state).await?;

    let mut alice = connect(addr, "alice").await?;
    let mut bob = connect(addr, "bob").await?;
    wait_for_connections(&registry, 2, Duration::from_secs(2)).await?;

    let (session_id, alice_view) = start_duel(&mut alice, &mut bob).await?;
    let attacker = own_character_ids(&alice_view)[0].clone();
    let target = opponent_character_ids(&alice_view)[0].clone();

    alice
        .send_json(&json!({
            "type": "attack",
            "session_id": session_id,
            "attacker_id": attacker,
            "target_id": target,
        }))
        .await?;

    let pushed_to_alice = alice.expect("game_state").await?;
    let pushed_to_bob = bob.expect("game_state").await?;

    let seen_by_alice = pushed_to_alice["snapshot"]["opponent"]["characters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == target.as_str())
        .unwrap()
        .clone();
    assert_eq!(seen_by_alice["health"], 20);

    let seen_by_bob = pushed_to_bob["snapshot"]["you"]["characters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == target.as_str())
        .unwrap()
        .clone();
    assert_eq!(seen_by_bob["health"], 20);
    assert_eq!(pushed_to_bob["snapshot"]["opponent"]["connected"], true);
    assert!(pushed_to_bob["snapshot"]["opponent"].get("bonus_hand").is_none());

    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[tokio::test]
async fn rejected_action_is_reported_to_the_caller_only() -> Result<(), Box<dyn std::error::Error>>
{
    let (server_handle, addr, server_join) = start_test_server(build_test_state()).await?;

    let mut alice = connect(addr, "alice").await?;
    let mut bob = connect(addr, "bob").await?;
    let (session_id, _) = start_duel(&mut alice, &mut bob).await?;

    bob.send_json(&json!({"type": "end_turn", "session_id": session_id}))
        .await?;

    let err = bob.expect("error").await?;
    assert_eq!(err["code"], "NOT_YOUR_TURN");
    assert!(alice.is_quiet(QUIET).await);

    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

#[tokio::test]
async fn disconnect_is_shown_to_the_opponent() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state();
    let registry = state.registry.clone();
    let (server_handle, addr, server_join) = start_test_server(state).await?;

    let mut alice = connect(addr, "alice").await?;
    let mut bob = connect(addr, "bob").await?;
    start_duel(&mut alice, &mut bob).await?;

    bob.close().await?;
    wait_for_connections(&registry, 1, Duration::from_secs(2)).await?;

    let update = alice.expect("game_state").await?;
    assert_eq!(update["snapshot"]["opponent"]["connected"], false);

    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}

/// Read pushes until the opponent's connection flag reads `connected`.
async fn await_opponent_connected(
    client: &mut WebSocketClient,
    connected: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    for _ in 0..5 {
        let update = client.expect("game_state").await?;
        if update["snapshot"]["opponent"]["connected"] == connected {
            return Ok(update);
        }
    }
    Err(format!("opponent never showed connected={connected}").into())
}

#[tokio::test]
async fn reconnected_player_acting_only_by_attack_is_tracked() -> Result<(), Box<dyn std::error::Error>>
{
    let state = build_test_state();
    let registry = state.registry.clone();
    let (server_handle, addr, server_join) = start_test_server(state).await?;

    let mut alice = connect(addr, "alice").await?;
    let mut bob = connect(addr, "bob").await?;
    let (session_id, alice_view) = start_duel(&mut alice, &mut bob).await?;

    alice.close().await?;
    wait_for_connections(&registry, 1, Duration::from_secs(2)).await?;
    await_opponent_connected(&mut bob, false).await?;

    // A fresh socket that never creates, joins, or reads the session.
    let mut alice = connect(addr, "alice").await?;
    alice
        .send_json(&json!({
            "type": "attack",
            "session_id": session_id,
            "attacker_id": own_character_ids(&alice_view)[0],
            "target_id": opponent_character_ids(&alice_view)[0],
        }))
        .await?;
    await_opponent_connected(&mut bob, true).await?;

    alice.close().await?;
    wait_for_connections(&registry, 1, Duration::from_secs(2)).await?;
    await_opponent_connected(&mut bob, false).await?;

    server_handle.stop(true).await;
    let _ = server_join.await;
    Ok(())
}
