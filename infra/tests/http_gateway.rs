use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lettervideo_domain::{
    BackendGateway, GatewayError, GenerationRequest, JobStatus, PublishRequest,
};
use lettervideo_infra::{HttpBackendGateway, HttpGatewayConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const QUEUED: &str = "Видео поставлено в очередь на генерацию";
const INVALID: &str = "Неверный формат данных";

#[derive(Default)]
struct MockBackend {
    received: Mutex<Vec<Value>>,
}

async fn generate_video(
    State(backend): State<Arc<MockBackend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.received.lock().unwrap().push(body.clone());
    let letter = body["letter"].as_str().unwrap_or_default();
    if letter.chars().count() < 100 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": INVALID })));
    }
    if letter.starts_with("duplicate") {
        return (
            StatusCode::OK,
            Json(json!({
                "message": "Такое письмо уже есть в очереди",
                "job_id": "J0",
                "queue_position": 0
            })),
        );
    }
    if letter.starts_with("full") {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Очередь переполнена" })),
        );
    }
    (
        StatusCode::ACCEPTED,
        Json(json!({ "message": QUEUED, "job_id": "J1", "queue_position": 3 })),
    )
}

async fn video_status(Path(job_id): Path<String>) -> Response {
    match job_id.as_str() {
        "J1" => Json(json!({ "status": "processing", "queue_position": 1 })).into_response(),
        "J2" => Json(json!({
            "status": "failed",
            "error": "Письмо не прошло фильтрацию",
            "queue_position": 0
        }))
        .into_response(),
        "J3" => Json(json!({ "status": "paused" })).into_response(),
        "garbled" => (StatusCode::OK, "<html>oops</html>").into_response(),
        "broken" => StatusCode::BAD_GATEWAY.into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Задание не найдено" })),
        )
            .into_response(),
    }
}

fn published() -> Value {
    json!([
        {
            "id": "11111111-1111-1111-1111-111111111111",
            "letter": "first letter",
            "video_filename": "videos/final_video_1.mp4",
            "preview_filename": "preview_images/image_1.png",
            "author": null
        },
        {
            "id": "22222222-2222-2222-2222-222222222222",
            "letter": "second letter",
            "video_filename": "videos/final_video_2.mp4",
            "preview_filename": "preview_images/image_2.png",
            "author": "Ivan Petrov"
        }
    ])
}

async fn publicated_videos() -> Json<Value> {
    Json(published())
}

async fn publicated_video_info(Path(id): Path<String>) -> Response {
    match published()
        .as_array()
        .and_then(|videos| videos.iter().find(|video| video["id"] == id.as_str()))
    {
        Some(video) => Json(video.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Видео не найдено" })),
        )
            .into_response(),
    }
}

async fn get_video(Path(id): Path<String>) -> Response {
    if id == "J1" {
        (StatusCode::OK, vec![0_u8, 0, 0, 24, b'f', b't', b'y', b'p']).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Видео не найдено" })),
        )
            .into_response()
    }
}

async fn get_image(Path(_id): Path<String>) -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G']
}

async fn publish_video(
    State(backend): State<Arc<MockBackend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.received.lock().unwrap().push(body.clone());
    if body["job_id"] == "22222222-2222-2222-2222-222222222222" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Такое видео с job_id уже сохранено" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Видео успешно опубликовано" })),
    )
}

async fn spawn_backend() -> (HttpBackendGateway, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::default());
    let app = Router::new()
        .route("/api/generate_video/", post(generate_video))
        .route("/api/video_status/{job_id}/", get(video_status))
        .route("/api/publicated_videos/", get(publicated_videos))
        .route("/api/publicated_video_info/{id}/", get(publicated_video_info))
        .route("/api/get_video/{id}/", get(get_video))
        .route("/api/get_image/{id}/", get(get_image))
        .route("/api/publish_video/", post(publish_video))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    (gateway_for(format!("http://{addr}")), backend)
}

fn gateway_for(base_url: String) -> HttpBackendGateway {
    HttpBackendGateway::new(&HttpGatewayConfig {
        base_url,
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    })
    .expect("client")
}

fn request(letter: String) -> GenerationRequest {
    GenerationRequest {
        letter_text: letter,
        voice_key: "levitan".to_string(),
        include_subtitles: true,
        include_music: false,
    }
}

#[tokio::test]
async fn submit_sends_the_wire_body_and_reads_the_acknowledgement() {
    let (gateway, backend) = spawn_backend().await;

    let ack = gateway.submit_job(&request("x".repeat(150))).await.unwrap();

    assert_eq!(ack.job_id.as_deref(), Some("J1"));
    assert_eq!(ack.message, QUEUED);
    assert_eq!(ack.queue_position, 3);
    let body = backend.received.lock().unwrap()[0].clone();
    assert_eq!(body["speaker"], "levitan");
    assert_eq!(body["subtitles"], true);
    assert_eq!(body["music"], false);
    assert_eq!(body["letter"].as_str().unwrap().len(), 150);
}

#[tokio::test]
async fn invalid_payload_is_returned_as_an_acknowledgement() {
    let (gateway, _) = spawn_backend().await;

    let ack = gateway.submit_job(&request("short".to_string())).await.unwrap();

    assert_eq!(ack.job_id, None);
    assert_eq!(ack.message, INVALID);
}

#[tokio::test]
async fn duplicate_letter_keeps_its_message() {
    let (gateway, _) = spawn_backend().await;

    let ack = gateway
        .submit_job(&request(format!("duplicate {}", "x".repeat(150))))
        .await
        .unwrap();

    assert_eq!(ack.message, "Такое письмо уже есть в очереди");
    assert_eq!(ack.job_id.as_deref(), Some("J0"));
}

#[tokio::test]
async fn full_queue_surfaces_the_error_key() {
    let (gateway, _) = spawn_backend().await;

    let err = gateway
        .submit_job(&request(format!("full {}", "x".repeat(150))))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(429));
    assert_eq!(err.backend_message(), Some("Очередь переполнена"));
}

#[tokio::test]
async fn poll_maps_statuses() {
    let (gateway, _) = spawn_backend().await;

    let processing = gateway.poll_job("J1").await.unwrap();
    assert_eq!(processing.status, JobStatus::Processing);
    assert_eq!(processing.queue_position, 1);

    let failed = gateway.poll_job("J2").await.unwrap();
    assert_eq!(failed.status, JobStatus::Failed);
    assert_eq!(
        failed.error_reason.as_deref(),
        Some("Письмо не прошло фильтрацию")
    );

    let unknown = gateway.poll_job("J3").await.unwrap();
    assert_eq!(unknown.status, JobStatus::Other("paused".to_string()));
    assert_eq!(unknown.queue_position, 0);
}

#[tokio::test]
async fn poll_errors_keep_status_and_body() {
    let (gateway, _) = spawn_backend().await;

    let missing = gateway.poll_job("nope").await.unwrap_err();
    assert!(missing.is_not_found());
    assert_eq!(missing.backend_message(), Some("Задание не найдено"));

    let broken = gateway.poll_job("broken").await.unwrap_err();
    assert_eq!(broken, GatewayError::status(502, None));

    let garbled = gateway.poll_job("garbled").await.unwrap_err();
    assert!(matches!(garbled, GatewayError::Decode(_)));
}

#[tokio::test]
async fn published_list_and_detail() {
    let (gateway, _) = spawn_backend().await;

    let videos = gateway.fetch_published_list().await.unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].letter_text, "first letter");
    assert_eq!(videos[0].author, None);
    assert_eq!(videos[1].author.as_deref(), Some("Ivan Petrov"));
    assert_eq!(videos[1].video_file, "videos/final_video_2.mp4");

    let detail = gateway
        .fetch_video_detail("22222222-2222-2222-2222-222222222222")
        .await
        .unwrap();
    assert_eq!(detail.preview_file, "preview_images/image_2.png");

    let missing = gateway.fetch_video_detail("missing").await.unwrap_err();
    assert!(missing.is_not_found());
    assert_eq!(missing.backend_message(), Some("Видео не найдено"));
}

#[tokio::test]
async fn binaries_are_returned_as_bytes() {
    let (gateway, _) = spawn_backend().await;

    let video = gateway.fetch_video_binary("J1").await.unwrap();
    assert_eq!(&video[4..8], b"ftyp");
    let image = gateway.fetch_preview_image("J1").await.unwrap();
    assert_eq!(&image[1..4], b"PNG");

    let missing = gateway.fetch_video_binary("J9").await.unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn publish_reports_the_backend_message() {
    let (gateway, backend) = spawn_backend().await;

    let ack = gateway
        .publish(&PublishRequest {
            letter: "x".repeat(150),
            author: None,
            job_id: "11111111-1111-1111-1111-111111111111".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ack.message, "Видео успешно опубликовано");
    assert!(backend.received.lock().unwrap()[0].get("author").is_none());

    let conflict = gateway
        .publish(&PublishRequest {
            letter: "x".repeat(150),
            author: Some("Anna K.".to_string()),
            job_id: "22222222-2222-2222-2222-222222222222".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(conflict.status_code(), Some(409));
    assert_eq!(backend.received.lock().unwrap()[1]["author"], "Anna K.");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let gateway = gateway_for(format!("http://{addr}"));
    let err = gateway.poll_job("J1").await.unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(err.status_code(), None);
}
