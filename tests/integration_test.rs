//! 端到端测试：用本地 axum 服务模拟中转后端和 Gemini API

use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

use question_extract::config::{Config, ExtractMode};
use question_extract::logger;
use question_extract::services::extractor_from_config;
use question_extract::services::prompt::EXTRACTION_PROMPT;
use question_extract::{App, OutputFormat, SubmitError, SubmitFlow};

const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// 按顺序返回预设响应并记录每次请求
#[derive(Default)]
struct FakeApi {
    calls: AtomicUsize,
    seen: Mutex<Vec<Value>>,
    replies: Mutex<VecDeque<(StatusCode, String)>>,
}

impl FakeApi {
    fn with_replies(replies: Vec<(StatusCode, String)>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    fn record(&self, seen: Value) -> (StatusCode, String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(seen);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "no reply scripted".to_string()))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_seen(&self) -> Value {
        self.seen.lock().unwrap().last().cloned().unwrap_or(Value::Null)
    }
}

async fn relay_handler(
    State(fake): State<Arc<FakeApi>>,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    let mut seen = json!({});
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        seen[name.as_str()] = json!({
            "fileName": file_name,
            "contentType": content_type,
            "len": bytes.len(),
        });
    }
    fake.record(seen)
}

async fn gemini_handler(
    State(fake): State<Arc<FakeApi>>,
    Path(model_action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    fake.record(json!({
        "modelAction": model_action,
        "key": query.get("key"),
        "body": body,
    }))
}

/// 迟迟不响应的后端
async fn slow_handler() -> (StatusCode, String) {
    tokio::time::sleep(Duration::from_secs(5)).await;
    (StatusCode::OK, json!({"success": true, "questions": []}).to_string())
}

/// 启动模拟服务，返回 base url
async fn spawn_fake(fake: Arc<FakeApi>) -> String {
    let router = Router::new()
        .route("/generate", post(relay_handler))
        .route("/slow", post(slow_handler))
        .route("/v1beta/models/:model_action", post(gemini_handler))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn test_config(base: &str, mode: ExtractMode) -> Config {
    Config {
        mode,
        relay_endpoint: format!("{}/generate", base),
        gemini_api_base_url: format!("{}/v1beta", base),
        gemini_api_key: Some("test-key".to_string()),
        color: false,
        ..Config::default()
    }
}

fn png_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&general_purpose::STANDARD.decode(PNG_BASE64).unwrap())
        .unwrap();
    file
}

fn questions_json(texts: &[&str]) -> Value {
    Value::Array(
        texts
            .iter()
            .map(|t| {
                json!({
                    "questionText": t,
                    "isExtraImageExist": "",
                    "referenceText": "",
                    "solutionText": "",
                    "options": [
                        {"text": "right", "isCorrect": true},
                        {"text": "wrong", "isCorrect": false}
                    ]
                })
            })
            .collect(),
    )
}

fn gemini_reply(text: &str) -> (StatusCode, String) {
    (
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": {"parts": [{"text": text}], "role": "model"},
                "finishReason": "STOP"
            }]
        })
        .to_string(),
    )
}

fn flow_for(config: &Config) -> SubmitFlow {
    SubmitFlow::new(extractor_from_config(config).unwrap())
}

fn texts(flow: &SubmitFlow) -> Vec<String> {
    flow.questions()
        .into_iter()
        .map(|q| q.question_text)
        .collect()
}

#[tokio::test]
async fn test_relay_success_keeps_order() {
    logger::init_test();
    let fake = FakeApi::with_replies(vec![(
        StatusCode::OK,
        json!({"success": true, "questions": questions_json(&["q1", "q2", "q3"])}).to_string(),
    )]);
    let base = spawn_fake(fake.clone()).await;
    let flow = flow_for(&test_config(&base, ExtractMode::Relay));
    let image = png_file();

    flow.select_file(image.path()).await.unwrap();
    let outcome = flow.submit().await.unwrap();

    assert_eq!(outcome.question_count, 3);
    assert_eq!(texts(&flow), vec!["q1", "q2", "q3"]);
    assert_eq!(fake.calls(), 1);

    let seen = fake.last_seen();
    let upload = &seen["image"];
    assert_eq!(upload["contentType"], "image/png");
    assert!(upload["fileName"].as_str().unwrap().ends_with(".png"));
    assert!(upload["len"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_relay_rejection_leaves_list_empty() {
    logger::init_test();
    let fake = FakeApi::with_replies(vec![(
        StatusCode::OK,
        json!({"success": false}).to_string(),
    )]);
    let base = spawn_fake(fake.clone()).await;
    let flow = flow_for(&test_config(&base, ExtractMode::Relay));
    let image = png_file();

    flow.select_file(image.path()).await.unwrap();
    let result = flow.submit().await;

    assert!(matches!(result, Err(SubmitError::RelayRejected)));
    assert!(flow.questions().is_empty());
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn test_no_image_sends_nothing() {
    logger::init_test();
    let fake = FakeApi::with_replies(vec![]);
    let base = spawn_fake(fake.clone()).await;

    for mode in [ExtractMode::Relay, ExtractMode::Direct] {
        let flow = flow_for(&test_config(&base, mode));
        assert!(matches!(flow.submit().await, Err(SubmitError::MissingImage)));
    }

    assert_eq!(fake.calls(), 0);
}

#[tokio::test]
async fn test_gemini_fenced_response() {
    logger::init_test();
    let raw = questions_json(&["first", "second"]).to_string();
    let fake = FakeApi::with_replies(vec![
        gemini_reply(&format!("```json\n{}\n```", raw)),
        gemini_reply(&raw),
    ]);
    let base = spawn_fake(fake.clone()).await;
    let flow = flow_for(&test_config(&base, ExtractMode::Direct));
    let image = png_file();
    flow.select_file(image.path()).await.unwrap();

    flow.submit().await.unwrap();
    let fenced = flow.questions();
    flow.submit().await.unwrap();
    let plain = flow.questions();

    assert_eq!(fenced, plain);
    assert_eq!(texts(&flow), vec!["first", "second"]);

    let seen = fake.last_seen();
    assert_eq!(seen["modelAction"], "gemini-1.5-flash:generateContent");
    assert_eq!(seen["key"], "test-key");
    let parts = &seen["body"]["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], EXTRACTION_PROMPT);
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[1]["inlineData"]["data"], PNG_BASE64);
}

#[tokio::test]
async fn test_gemini_malformed_json_keeps_previous_list() {
    logger::init_test();
    let fake = FakeApi::with_replies(vec![
        gemini_reply(&questions_json(&["kept"]).to_string()),
        gemini_reply("Here are the questions: 1) ..."),
    ]);
    let base = spawn_fake(fake.clone()).await;
    let flow = flow_for(&test_config(&base, ExtractMode::Direct));
    let image = png_file();
    flow.select_file(image.path()).await.unwrap();

    flow.submit().await.unwrap();
    let result = flow.submit().await;

    assert!(matches!(result, Err(SubmitError::MalformedJson { .. })));
    assert_eq!(texts(&flow), vec!["kept"]);
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn test_gemini_no_candidates() {
    logger::init_test();
    let function_call = json!({
        "candidates": [{
            "content": {
                "parts": [{"functionCall": {"name": "lookup", "args": {}}}],
                "role": "model"
            },
            "finishReason": "STOP"
        }]
    });
    let fake = FakeApi::with_replies(vec![
        (StatusCode::OK, json!({"candidates": []}).to_string()),
        (StatusCode::OK, function_call.to_string()),
    ]);
    let base = spawn_fake(fake.clone()).await;
    let flow = flow_for(&test_config(&base, ExtractMode::Direct));
    let image = png_file();
    flow.select_file(image.path()).await.unwrap();

    assert!(matches!(flow.submit().await, Err(SubmitError::NoCandidate)));
    // 第一个片段不是文本
    assert!(matches!(flow.submit().await, Err(SubmitError::NoCandidate)));
    assert!(flow.questions().is_empty());
    assert_eq!(fake.calls(), 2);
}

#[tokio::test]
async fn test_gemini_error_status() {
    logger::init_test();
    let fake = FakeApi::with_replies(vec![(
        StatusCode::FORBIDDEN,
        json!({"error": {"message": "API key not valid"}}).to_string(),
    )]);
    let base = spawn_fake(fake.clone()).await;
    let flow = flow_for(&test_config(&base, ExtractMode::Direct));
    let image = png_file();
    flow.select_file(image.path()).await.unwrap();

    match flow.submit().await {
        Err(SubmitError::BadStatus { status, body, .. }) => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_relay_is_transport_error() {
    logger::init_test();
    // 先占用一个端口再释放，保证没有服务在监听
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let flow = flow_for(&test_config(&base, ExtractMode::Relay));
    let image = png_file();
    flow.select_file(image.path()).await.unwrap();

    assert!(matches!(flow.submit().await, Err(SubmitError::Transport { .. })));
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    logger::init_test();
    let fake = FakeApi::with_replies(vec![]);
    let base = spawn_fake(fake).await;
    let config = Config {
        relay_endpoint: format!("{}/slow", base),
        request_timeout_secs: Some(1),
        ..test_config(&base, ExtractMode::Relay)
    };
    let flow = flow_for(&config);
    let image = png_file();
    flow.select_file(image.path()).await.unwrap();

    let started = std::time::Instant::now();
    match flow.submit().await {
        Err(SubmitError::Transport { source, .. }) => assert!(source.is_timeout()),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(!flow.is_busy());
    assert!(flow.questions().is_empty());
}

#[tokio::test]
async fn test_app_run_outputs() {
    logger::init_test();
    let fake = FakeApi::with_replies(vec![
        gemini_reply(&questions_json(&["rendered"]).to_string()),
        gemini_reply(&questions_json(&["as json"]).to_string()),
    ]);
    let base = spawn_fake(fake.clone()).await;
    let app = App::initialize(test_config(&base, ExtractMode::Direct)).unwrap();
    let image = png_file();

    let (output, result) = app
        .run(Some(image.path()), OutputFormat::Rendered)
        .await
        .unwrap();
    assert!(result.is_ok());
    assert!(output.starts_with("The Brain of Ayotto"));
    assert!(output.contains("1. rendered"));
    assert!(output.contains("✔ A. right"));

    let (output, result) = app.run(None, OutputFormat::Json).await.unwrap();
    assert!(result.is_ok());
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["questionText"], "as json");
}

#[tokio::test]
async fn test_app_run_without_image_warns() {
    logger::init_test();
    let app = App::initialize(test_config("http://127.0.0.1:9", ExtractMode::Relay)).unwrap();

    let (output, result) = app.run(None, OutputFormat::Rendered).await.unwrap();

    assert!(matches!(result, Err(SubmitError::MissingImage)));
    assert!(output.contains("Please select an image first."));
}

#[test]
fn test_direct_mode_without_key_fails_to_initialize() {
    let config = Config {
        gemini_api_key: None,
        ..Config::default()
    };
    assert!(App::initialize(config).is_err());
}

/// 真实调用 Gemini API
///
/// 运行方式：
/// ```bash
/// GEMINI_API_KEY=... EXTRACT_IMAGE=page.png cargo test test_live_gemini -- --ignored --nocapture
/// ```
#[tokio::test]
#[ignore]
async fn test_live_gemini() {
    logger::init_test();
    let config = Config::from_env();
    let image_path = std::env::var("EXTRACT_IMAGE").expect("需要设置 EXTRACT_IMAGE");

    let flow = flow_for(&config);
    flow.select_file(&image_path).await.unwrap();
    let outcome = flow.submit().await.unwrap();

    println!("提取到 {} 道题目", outcome.question_count);
    for q in flow.questions() {
        println!("{:#?}", q);
    }
}
