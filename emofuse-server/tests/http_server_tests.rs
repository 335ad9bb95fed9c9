//! HTTP Server & Routing Integration Tests

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use emofuse_server::build_router;
use helpers::{default_rig, generate_wav_bytes, AudioConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "emofuse-test-boundary";

/// One multipart/form-data part
struct Part<'a> {
    name: &'a str,
    file_name: Option<&'a str>,
    content_type: Option<&'a str>,
    data: Vec<u8>,
}

impl<'a> Part<'a> {
    fn text(name: &'a str, value: &str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }

    fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: Vec<u8>) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }
}

fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/process_text_audio")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_root_route_serves_html() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "emofuse-server");
    assert_eq!(body["streaming"], false);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let response = app.oneshot(get("/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
}

#[tokio::test]
async fn test_visual_emotion_defaults_to_neutral() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let response = app.oneshot(get("/get_visual_emotion")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["visual_emotion"], "Neutral");
    assert!(body["updated_at"].is_null());
}

#[tokio::test]
async fn test_visual_emotion_reflects_stream() {
    let rig = helpers::TestRig::streaming(
        std::sync::Arc::new(helpers::FixedDetector("happy")),
        std::sync::Arc::new(emofuse_server::services::DurationHeuristic::default()),
    );
    rig.writer
        .as_ref()
        .unwrap()
        .publish(emofuse_common::EmotionLabel::from("sad"));
    let app = build_router(rig.app_state());

    let body = json_body(app.oneshot(get("/get_visual_emotion")).await.unwrap()).await;
    assert_eq!(body["visual_emotion"], "Sad");
    assert_eq!(body["streaming"], true);
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_events_route_is_sse() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let response = app.oneshot(get("/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/event-stream"));
}

#[tokio::test]
async fn test_text_only_request() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let response = app
        .oneshot(multipart_request(&[Part::text("text_input", "I feel happy")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["final_emotion"], "Happy");
    assert_eq!(body["text_emotion"], "Happy");
    assert_eq!(body["visual_emotion"], "No Data");
    assert_eq!(body["speech_emotion"], "No Data");
    assert_eq!(body["translated_text"], "I feel happy");
    assert_eq!(body["lang_status"], "UNTRANSLATED");
    assert_eq!(body["visual_source"], "none");
    assert!(body["request_id"].is_string());
    assert_eq!(body["signals"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_full_request() {
    // Given: image (happy), 6s clip (Surprise), sad text
    let rig = default_rig();
    let app = build_router(rig.app_state());
    let request = multipart_request(&[
        Part::text("text_input", "so much grief"),
        Part::file(
            "audio_file",
            "voice.wav",
            "audio/wav",
            generate_wav_bytes(&AudioConfig::seconds(6.0)),
        ),
        Part::file("image_file", "me.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0]),
        Part::text("unrelated_field", "ignored"),
    ]);

    // When
    let response = app.oneshot(request).await.unwrap();

    // Then: three distinct votes, Visual wins the tie
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["visual_emotion"], "Happy");
    assert_eq!(body["speech_emotion"], "Surprise");
    assert_eq!(body["text_emotion"], "Sad");
    assert_eq!(body["final_emotion"], "Happy");
    assert_eq!(body["visual_source"], "upload");
    assert_eq!(rig.scratch_entries(), 0);
}

#[tokio::test]
async fn test_empty_file_inputs_are_absent() {
    let rig = default_rig();
    let app = build_router(rig.app_state());
    let request = multipart_request(&[
        Part::text("text_input", "   "),
        Part::file("audio_file", "", "application/octet-stream", vec![]),
        Part::file("image_file", "", "application/octet-stream", vec![]),
    ]);

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["final_emotion"], "No Data");
    assert_eq!(body["translated_text"], "No Input");
    assert_eq!(body["lang_status"], "N/A");
}

#[tokio::test]
async fn test_bad_audio_still_returns_record() {
    let rig = default_rig();
    let app = build_router(rig.app_state());
    let request = multipart_request(&[
        Part::text("text_input", "pure rage"),
        Part::file("audio_file", "voice.wav", "audio/wav", b"garbage".to_vec()),
    ]);

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["speech_emotion"], "Error");
    assert_eq!(body["text_emotion"], "Angry");
    assert_eq!(body["final_emotion"], "Angry");
}

#[tokio::test]
async fn test_non_multipart_is_bad_request() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let request = Request::builder()
        .method("POST")
        .uri("/process_text_audio")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"text_input":"hi"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_non_utf8_text_is_bad_request() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let part = Part {
        name: "text_input",
        file_name: None,
        content_type: None,
        data: vec![0xff, 0xfe, 0xfd],
    };
    let response = app.oneshot(multipart_request(&[part])).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("UTF-8"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let rig = default_rig();
    let app = build_router(rig.app_state());

    let response = app.oneshot(get("/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
