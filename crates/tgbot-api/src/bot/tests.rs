//! Tests for the Bot API client against a mock Bot API server.

use super::fetch::decode_batch;
use super::request::parse_envelope;
use super::*;
use crate::polling::Poller;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tgbot_core::{config::PollConfig, error::BotError, traits::Fetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_bot(server: &MockServer) -> Bot {
    Bot::from_config(&BotConfig {
        token: "TEST".into(),
        api_url: server.uri(),
        ..BotConfig::default()
    })
}

fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": result}))
}

fn message_json(chat_id: i64, text: &str) -> Value {
    json!({
        "message_id": 11,
        "date": 1_700_000_000,
        "chat": {"id": chat_id, "type": "private"},
        "text": text,
    })
}

async fn request_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|r| String::from_utf8(r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_get_me() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getMe"))
        .respond_with(ok(json!({
            "id": 42, "is_bot": true, "first_name": "Echo", "username": "echo_bot"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let me = test_bot(&server).get_me().await.unwrap();
    assert_eq!(me.id, 42);
    assert!(me.is_bot);
    assert_eq!(me.display_name(), "@echo_bot");
}

#[tokio::test]
async fn test_service_error_carries_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false, "error_code": 401, "description": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let err = test_bot(&server).get_me().await.unwrap_err();
    match err {
        BotError::Service { code, description } => {
            assert_eq!(code, Some(401));
            assert_eq!(description, "Unauthorized");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = test_bot(&server).get_me().await.unwrap_err();
    assert!(matches!(err, BotError::Transport(ref m) if m.contains("malformed response")));
}

#[tokio::test]
async fn test_connection_failure_hides_token() {
    let bot = Bot::new("SECRET").with_base_url("http://127.0.0.1:9/botSECRET");
    let err = bot.get_me().await.unwrap_err();
    match err {
        BotError::Transport(msg) => assert!(!msg.contains("SECRET"), "token leaked: {msg}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_message_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/sendMessage"))
        .respond_with(ok(message_json(7, "hello world")))
        .mount(&server)
        .await;

    let msg = test_bot(&server)
        .send_message(&MessageConfig::new(7, "hello world"))
        .await
        .unwrap();
    assert_eq!(msg.text.as_deref(), Some("hello world"));

    let bodies = request_bodies(&server).await;
    assert_eq!(
        bodies,
        vec!["chat_id=7&text=hello+world&disable_web_page_preview=false"]
    );
}

#[tokio::test]
async fn test_forward_and_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/forwardMessage"))
        .respond_with(ok(message_json(1, "fwd")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botTEST/sendLocation"))
        .respond_with(ok(json!({
            "message_id": 12,
            "chat": {"id": 1, "type": "private"},
            "location": {"latitude": 52.52, "longitude": 13.405}
        })))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    bot.forward_message(&ForwardConfig::new(1, 2, 3))
        .await
        .unwrap();
    let msg = bot
        .send_location(&LocationConfig::new(1, 52.52, 13.405))
        .await
        .unwrap();
    assert_eq!(msg.location.unwrap().longitude, 13.405);

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0], "chat_id=1&from_chat_id=2&message_id=3");
    assert_eq!(bodies[1], "chat_id=1&latitude=52.520000&longitude=13.405000");
}

#[tokio::test]
async fn test_chat_action_and_profile_photos() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/sendChatAction"))
        .respond_with(ok(json!(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUserProfilePhotos"))
        .respond_with(ok(json!({
            "total_count": 1,
            "photos": [[{"file_id": "p1", "width": 160, "height": 160}]]
        })))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    bot.send_chat_action(&ChatActionConfig::new(5, ChatAction::Typing))
        .await
        .unwrap();
    let mut cfg = UserProfilePhotosConfig::new(5);
    cfg.limit = 1;
    let photos = bot.get_user_profile_photos(&cfg).await.unwrap();
    assert_eq!(photos.total_count, 1);
    assert_eq!(photos.photos[0][0].file_id, "p1");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0], "chat_id=5&action=typing");
    assert_eq!(bodies[1], "user_id=5&limit=1");
}

#[tokio::test]
async fn test_resend_media_by_file_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok(message_json(3, "")))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    bot.send_photo(&PhotoConfig::new(3, "PHOTO").caption("nice"))
        .await
        .unwrap();
    let mut audio = AudioConfig::new(3, "AUDIO");
    audio.reply_to_message_id = 9;
    bot.send_audio(&audio).await.unwrap();
    bot.send_document(&DocumentConfig::new(3, "DOC"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(
        paths,
        vec!["/botTEST/sendPhoto", "/botTEST/sendAudio", "/botTEST/sendDocument"]
    );
    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0], "chat_id=3&photo=PHOTO&caption=nice");
    assert_eq!(bodies[1], "chat_id=3&audio=AUDIO&reply_to_message_id=9");
    assert_eq!(bodies[2], "chat_id=3&document=DOC");
}

#[tokio::test]
async fn test_get_updates_omits_zero_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(ok(json!([{"update_id": 8}])))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    let batch = bot.fetch(0, 0, 0).await.unwrap();
    assert_eq!(batch.updates.len(), 1);
    bot.get_updates(&PollConfig {
        offset: 9,
        limit: 10,
        timeout_secs: 1,
        ..PollConfig::default()
    })
    .await
    .unwrap();

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0], "");
    assert_eq!(bodies[1], "offset=9&limit=10&timeout=1");
}

#[tokio::test]
async fn test_get_updates_skips_malformed_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(ok(json!([
            {"update_id": 1, "message": message_json(1, "a")},
            {"update_id": 2, "message": {"message_id": "not a number"}},
            {"garbage": true},
            {"update_id": 3}
        ])))
        .mount(&server)
        .await;

    let batch = test_bot(&server).fetch(0, 0, 0).await.unwrap();
    let ids: Vec<_> = batch.updates.iter().map(|u| u.update_id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(batch.skipped, vec![2]);
}

#[tokio::test]
async fn test_get_updates_fail_batch_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(ok(json!([
            {"update_id": 1},
            {"update_id": 2, "message": {"message_id": "not a number"}}
        ])))
        .mount(&server)
        .await;

    let bot = test_bot(&server).with_malformed_policy(MalformedPolicy::FailBatch);
    let err = bot.fetch(0, 0, 0).await.unwrap_err();
    assert!(matches!(err, BotError::Transport(ref m) if m.contains("malformed update 2")));
}

#[tokio::test]
async fn test_poller_over_http_skips_malformed_and_moves_on() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(ok(json!([
            {"update_id": 5, "message": message_json(1, "hi")},
            {"update_id": 6, "message": {"chat": "broken"}}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let mut poller = Poller::new(Arc::new(test_bot(&server)));
    let mut rx = poller.start(PollConfig::default()).unwrap();
    let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(update.update_id, 5);

    tokio::time::timeout(Duration::from_secs(5), async {
        while request_bodies(&server).await.len() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    poller.stop();
    poller.wait().await;

    // The malformed update 6 is never requested again.
    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[0], "");
    assert!(bodies[1..].iter().all(|b| b == "offset=7"), "{bodies:?}");
    assert_eq!(poller.cursor(), 7);
}

#[tokio::test]
async fn test_poller_over_http_fail_batch_refetches_same_offset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST/getUpdates"))
        .respond_with(ok(json!([
            {"update_id": 5, "message": message_json(1, "hi")},
            {"update_id": 6, "message": {"chat": "broken"}}
        ])))
        .mount(&server)
        .await;

    let bot = test_bot(&server).with_malformed_policy(MalformedPolicy::FailBatch);
    let mut poller = Poller::new(Arc::new(bot));
    let config = PollConfig {
        offset: 5,
        retry: tgbot_core::config::RetryPolicy::exponential(
            Duration::from_millis(5),
            Duration::from_millis(5),
        ),
        ..PollConfig::default()
    };
    let mut rx = poller.start(config).unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while request_bodies(&server).await.len() < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    poller.stop();
    poller.wait().await;

    // Nothing from the failed batch is published and the session is stuck.
    assert!(rx.recv().await.is_none());
    assert!(request_bodies(&server)
        .await
        .iter()
        .all(|b| b == "offset=5"));
    assert_eq!(poller.cursor(), 5);
}

#[test]
fn test_parse_envelope_null_result() {
    assert_eq!(
        parse_envelope("x", r#"{"ok": true}"#).unwrap(),
        Value::Null
    );
}

#[test]
fn test_parse_envelope_missing_description() {
    let err = parse_envelope("sendMessage", r#"{"ok": false}"#).unwrap_err();
    assert!(matches!(err, BotError::Service { ref description, .. } if description == "sendMessage failed"));
}

#[test]
fn test_decode_batch_rejects_non_array() {
    let err = decode_batch(json!({"update_id": 1}), MalformedPolicy::Skip).unwrap_err();
    assert!(matches!(err, BotError::Transport(_)));
    assert!(decode_batch(Value::Null, MalformedPolicy::Skip)
        .unwrap()
        .updates
        .is_empty());
}

#[test]
fn test_decode_batch_keeps_service_order() {
    let batch = decode_batch(
        json!([{"update_id": 7}, {"update_id": 5}, {"update_id": 6}]),
        MalformedPolicy::Skip,
    )
    .unwrap();
    let ids: Vec<_> = batch.updates.iter().map(|u| u.update_id).collect();
    assert_eq!(ids, vec![7, 5, 6]);
    assert!(batch.skipped.is_empty());
}
