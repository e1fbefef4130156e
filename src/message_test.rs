use super::*;
use serde_json::json;

// =============================================================================
// ServerMessage encoding
// =============================================================================

#[test]
fn add_marker_nests_position() {
    let id = Uuid::new_v4();
    let msg = ServerMessage::AddMarker { position: Position { lat: 10.0, lng: -20.5, id } };
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(
        value,
        json!({"type": "add-marker", "position": {"lat": 10.0, "lng": -20.5, "id": id.to_string()}})
    );
}

#[test]
fn remove_marker_carries_id_string() {
    let id = Uuid::new_v4();
    let value = serde_json::to_value(ServerMessage::RemoveMarker { id }).unwrap();
    assert_eq!(value, json!({"type": "remove-marker", "id": id.to_string()}));
}

#[test]
fn counter_update_is_integer() {
    let value = serde_json::to_value(ServerMessage::CounterUpdate { value: 42 }).unwrap();
    assert_eq!(value, json!({"type": "counter-update", "value": 42}));
}

#[test]
fn game_messages_use_game_tags() {
    let moved = ServerMessage::GameMove { from: "e2".into(), to: "e4".into(), fen: "fen-1".into() };
    assert_eq!(
        serde_json::to_value(&moved).unwrap(),
        json!({"type": "game-move", "from": "e2", "to": "e4", "fen": "fen-1"})
    );
    let sync = ServerMessage::GameSync { fen: "start".into() };
    assert_eq!(serde_json::to_value(&sync).unwrap(), json!({"type": "game-sync", "fen": "start"}));
}

#[test]
fn kind_matches_serialized_tag() {
    let msgs = [
        ServerMessage::RemoveMarker { id: Uuid::nil() },
        ServerMessage::CounterUpdate { value: 0 },
        ServerMessage::GameSync { fen: String::new() },
    ];
    for msg in msgs {
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"].as_str(), Some(msg.kind()));
    }
}

// =============================================================================
// ClientMessage decoding
// =============================================================================

#[test]
fn decode_increment_counter() {
    let msg = ClientMessage::decode(r#"{"type":"increment-counter"}"#).unwrap();
    assert_eq!(msg, ClientMessage::IncrementCounter);
}

#[test]
fn decode_game_move() {
    let msg = ClientMessage::decode(r#"{"type":"game-move","from":"g1","to":"f3","fen":"abc"}"#).unwrap();
    assert_eq!(msg, ClientMessage::GameMove { from: "g1".into(), to: "f3".into(), fen: "abc".into() });
}

#[test]
fn decode_accepts_legacy_chess_move_tag() {
    let msg = ClientMessage::decode(r#"{"type":"chess-move","from":"a2","to":"a3","fen":"xyz"}"#).unwrap();
    assert!(matches!(msg, ClientMessage::GameMove { ref fen, .. } if fen == "xyz"));
}

#[test]
fn decode_rejects_unknown_tag() {
    let err = ClientMessage::decode(r#"{"type":"launch-rockets"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn decode_rejects_missing_tag() {
    assert!(ClientMessage::decode(r#"{"from":"a","to":"b","fen":"c"}"#).is_err());
}

#[test]
fn decode_rejects_game_move_without_fen() {
    assert!(ClientMessage::decode(r#"{"type":"game-move","from":"a","to":"b"}"#).is_err());
}

#[test]
fn decode_rejects_invalid_json() {
    assert!(ClientMessage::decode("not json").is_err());
    assert!(ClientMessage::decode("").is_err());
}

#[test]
fn decode_bytes_accepts_utf8_json() {
    let msg = ClientMessage::decode_bytes(br#"{"type":"increment-counter"}"#).unwrap();
    assert_eq!(msg, ClientMessage::IncrementCounter);
}

#[test]
fn decode_bytes_rejects_invalid_utf8() {
    let err = ClientMessage::decode_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, DecodeError::Utf8(_)));
}
