//! End-to-end wizard run against a stub backend
//!
//! Walks all four steps through `Wizard` with the real `HttpBackend`, the way
//! the terminal UI drives it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use podcast_wizard::api::HttpBackend;
use podcast_wizard::session::Field;
use podcast_wizard::wizard::{Action, StepId, SyncStatus, Wizard, WizardOptions};

#[derive(Clone, Default)]
struct Stub {
    cache_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn news() -> Json<Value> {
    Json(json!({
        "news": [{ "title": "Rates hold", "summary": "Central bank pauses" }],
        "error": null
    }))
}

async fn outline(Json(body): Json<Value>) -> Json<Value> {
    let text = body["text"].as_str().unwrap_or_default();
    Json(json!({ "result": format!("Outline of {} chars", text.len()) }))
}

async fn questions() -> Json<Value> {
    Json(json!({ "result": "Why now?" }))
}

async fn script() -> Json<Value> {
    Json(json!({ "result": "**Andy:** Welcome\n**Amily:** Thanks" }))
}

async fn audio() -> Json<Value> {
    Json(json!({ "audio_file": "episode.mp3", "error": null }))
}

async fn cache(State(stub): State<Stub>, Json(body): Json<Value>) -> Json<Value> {
    stub.cache_bodies.lock().unwrap().push(body);
    Json(json!({ "message": "Cache updated successfully" }))
}

async fn start_stub() -> (String, Stub) {
    let stub = Stub::default();
    let router = Router::new()
        .route("/api/daily-news", get(news))
        .route("/api/generate-outline", post(outline))
        .route("/api/generate-questions", post(questions))
        .route("/api/generate-script", post(script))
        .route("/api/generate-audio", post(audio))
        .route("/api/update-news-cache", post(cache))
        .with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), stub)
}

fn options() -> WizardOptions {
    WizardOptions {
        cache_enabled: true,
        cache_debounce: Duration::from_secs(30),
        format_dialogue: true,
        speakers: vec!["Andy".to_string(), "Amily".to_string()],
    }
}

async fn run(wizard: &mut Wizard, action: Action) {
    assert!(wizard.start(action), "{action:?} should start");
    let (done, applied) = wizard.next_completion().await.unwrap();
    assert_eq!(done, action);
    assert!(applied, "{action:?} result should apply");
}

#[tokio::test]
async fn test_full_wizard_run() {
    let (base, stub) = start_stub().await;
    let backend = Arc::new(HttpBackend::with_base_url(base.clone()).unwrap());
    let mut wizard = Wizard::new(backend, options());

    // Step 1
    run(&mut wizard, Action::FetchNews).await;
    assert_eq!(
        wizard.session().content(),
        "Rates hold\nCentral bank pauses\n\n"
    );
    assert!(wizard.next());

    // Step 2: generated values are written to the cache right away
    run(&mut wizard, Action::GenerateOutline).await;
    assert_eq!(wizard.next_sync_result().await, Some(SyncStatus::Synced));
    run(&mut wizard, Action::GenerateQuestions).await;
    assert_eq!(wizard.next_sync_result().await, Some(SyncStatus::Synced));
    assert_eq!(wizard.session().outline(), "Outline of 32 chars");
    assert_eq!(wizard.session().questions(), "Why now?");

    wizard.edit(Field::Questions, "Why now? Who decides?");
    assert!(wizard.next());

    // Step 3
    run(&mut wizard, Action::GenerateScript).await;
    assert_eq!(
        wizard.session().generated_script(),
        "Andy：\"Welcome\"\nAmily：\"Thanks\""
    );
    assert!(wizard.next());
    assert_eq!(wizard.step(), StepId::AudioGeneration);

    // Step 4: the draft was carried over
    assert_eq!(wizard.session().script(), wizard.session().generated_script());
    run(&mut wizard, Action::GenerateAudio).await;
    assert_eq!(wizard.audio_url(), Some(format!("{base}/audio/episode.mp3").as_str()));

    // The question edit was still pending; shutdown flushes it
    let state = wizard.shutdown().await;
    assert_eq!(state.questions, "Why now? Who decides?");

    let bodies = stub.cache_bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![
            json!({ "outline": "Outline of 32 chars" }),
            json!({ "questions": "Why now?" }),
            json!({ "questions": "Why now? Who decides?" }),
        ]
    );
}

#[tokio::test]
async fn test_backend_down_keeps_wizard_usable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = Arc::new(HttpBackend::with_base_url(format!("http://{addr}")).unwrap());
    let mut wizard = Wizard::new(backend, options());

    assert!(wizard.start(Action::FetchNews));
    let (_, applied) = wizard.next_completion().await.unwrap();
    assert!(applied);
    assert!(wizard.fetch_error().is_some());
    assert!(!wizard.is_loading(Action::FetchNews));

    // Manual entry still works
    wizard.edit(Field::Content, "typed");
    assert!(wizard.next());
}
