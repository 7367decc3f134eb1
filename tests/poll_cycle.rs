//! Poll-cycle tests against a stub detection server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use object_announcer::client::ObjectsClient;
use object_announcer::config::{Config, PollConfig};
use object_announcer::objects::DetectedObject;
use object_announcer::render::RenderTarget;
use object_announcer::service::{poll_cycle, AnnouncerService};
use object_announcer::speech::Speaker;

/// In-process `/get_objects` server with a swappable response.
struct StubServer {
    url: String,
    response: Arc<Mutex<(StatusCode, String)>>,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    async fn start(status: StatusCode, body: &str) -> Self {
        let response = Arc::new(Mutex::new((status, body.to_string())));
        let hits = Arc::new(AtomicUsize::new(0));

        let state = response.clone();
        let hit_counter = hits.clone();
        let app = Router::new().route(
            "/get_objects",
            get(move || {
                let state = state.clone();
                let hit_counter = hit_counter.clone();
                async move {
                    hit_counter.fetch_add(1, Ordering::Relaxed);
                    state.lock().unwrap().clone()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/get_objects", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url,
            response,
            hits,
        }
    }

    fn set(&self, status: StatusCode, body: &str) {
        *self.response.lock().unwrap() = (status, body.to_string());
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    fn client(&self) -> ObjectsClient {
        ObjectsClient::new(&PollConfig {
            endpoint: self.url.clone(),
            ..PollConfig::default()
        })
    }
}

#[derive(Default)]
struct RecordingTarget {
    entries: Vec<String>,
    replace_calls: usize,
}

impl RenderTarget for RecordingTarget {
    fn replace(&mut self, objects: &[DetectedObject]) {
        self.replace_calls += 1;
        self.entries = objects.iter().map(DetectedObject::display_line).collect();
    }
}

#[derive(Default)]
struct RecordingSpeaker {
    utterances: Vec<String>,
}

impl Speaker for RecordingSpeaker {
    fn submit(&mut self, text: &str) {
        self.utterances.push(text.to_string());
    }
}

const TWO_OBJECTS: &str = r#"[["person", 2.5, "front"], ["car", 10, "left"]]"#;

#[tokio::test]
async fn renders_and_announces_in_order() {
    let server = StubServer::start(StatusCode::OK, TWO_OBJECTS).await;
    let client = server.client();
    let target = Mutex::new(RecordingTarget::default());
    let speaker = Mutex::new(RecordingSpeaker::default());

    poll_cycle(&client, &target, &speaker, false).await;

    let target = target.into_inner().unwrap();
    assert_eq!(target.replace_calls, 1);
    assert_eq!(
        target.entries,
        ["person - 2.5m (front)", "car - 10m (left)"]
    );

    let speaker = speaker.into_inner().unwrap();
    assert_eq!(
        speaker.utterances,
        ["person is 2.5 meters on front", "car is 10 meters on left"]
    );
}

#[tokio::test]
async fn empty_array_clears_previous_entries() {
    let server = StubServer::start(StatusCode::OK, TWO_OBJECTS).await;
    let client = server.client();
    let target = Mutex::new(RecordingTarget::default());
    let speaker = Mutex::new(RecordingSpeaker::default());

    poll_cycle(&client, &target, &speaker, false).await;
    assert_eq!(target.lock().unwrap().entries.len(), 2);

    server.set(StatusCode::OK, "[]");
    poll_cycle(&client, &target, &speaker, false).await;

    let target = target.into_inner().unwrap();
    assert_eq!(target.replace_calls, 2);
    assert!(target.entries.is_empty());

    // Only the first cycle's objects were spoken
    assert_eq!(speaker.into_inner().unwrap().utterances.len(), 2);
}

#[tokio::test]
async fn server_error_keeps_prior_state_and_stays_silent() {
    let server = StubServer::start(StatusCode::OK, TWO_OBJECTS).await;
    let client = server.client();
    let target = Mutex::new(RecordingTarget::default());
    let speaker = Mutex::new(RecordingSpeaker::default());

    poll_cycle(&client, &target, &speaker, false).await;

    server.set(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    poll_cycle(&client, &target, &speaker, false).await;

    let target = target.into_inner().unwrap();
    assert_eq!(target.replace_calls, 1);
    assert_eq!(
        target.entries,
        ["person - 2.5m (front)", "car - 10m (left)"]
    );
    assert_eq!(speaker.into_inner().unwrap().utterances.len(), 2);
}

#[tokio::test]
async fn non_json_body_is_treated_as_failure() {
    let server = StubServer::start(StatusCode::OK, "<html>not json</html>").await;
    let client = server.client();
    let target = Mutex::new(RecordingTarget::default());
    let speaker = Mutex::new(RecordingSpeaker::default());

    poll_cycle(&client, &target, &speaker, false).await;

    assert_eq!(target.into_inner().unwrap().replace_calls, 0);
    assert!(speaker.into_inner().unwrap().utterances.is_empty());
}

#[tokio::test]
async fn unreachable_server_is_treated_as_failure() {
    // Bind a port, record the address, then drop the listener so nothing
    // answers there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ObjectsClient::new(&PollConfig {
        endpoint: format!("http://{addr}/get_objects"),
        ..PollConfig::default()
    });
    let target = Mutex::new(RecordingTarget::default());
    let speaker = Mutex::new(RecordingSpeaker::default());

    poll_cycle(&client, &target, &speaker, false).await;

    assert_eq!(target.into_inner().unwrap().replace_calls, 0);
    assert!(speaker.into_inner().unwrap().utterances.is_empty());
}

#[tokio::test]
async fn timer_keeps_polling_through_failures() {
    let server = StubServer::start(StatusCode::INTERNAL_SERVER_ERROR, "down").await;

    let mut config = Config::default();
    config.poll.endpoint = server.url.clone();
    config.poll.interval_ms = 50;
    config.history.enabled = false;

    let service = AnnouncerService::new(
        config,
        RecordingTarget::default(),
        RecordingSpeaker::default(),
    );
    let handle = tokio::spawn(async move { service.run().await });

    tokio::time::sleep(Duration::from_millis(320)).await;
    handle.abort();

    // First cycle fires immediately, then one per interval
    assert!(server.hits() >= 3, "expected >= 3 polls, got {}", server.hits());
}
