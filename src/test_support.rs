use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
};
use tempfile::TempDir;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, security, state::AppState};
use crate::db::types::UserRole;
use crate::repositories::exams::InMemoryExamStore;
use crate::services::storage::MediaStorage;

const TEST_SECRET_KEY: &str = "test-secret";
const BOUNDARY: &str = "----campus-exams-test-boundary";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: api::router::App,
    pub(crate) store: Arc<InMemoryExamStore>,
    pub(crate) media_dir: TempDir,
    _guard: OwnedMutexGuard<()>,
}

impl TestContext {
    pub(crate) fn staff_token(&self) -> String {
        bearer_token(self.state.settings(), UserRole::Faculty, None)
    }

    /// Names of the files currently in the media directory.
    pub(crate) fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.media_dir.path())
            .expect("media dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("EXAMS_ENV", "test");
    std::env::set_var("EXAMS_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("ALGORITHM", "HS256");
    std::env::set_var("API_PREFIX", "/api");
    std::env::set_var("MEDIA_URL_PATH", "/media");
    std::env::set_var("MAX_UPLOAD_SIZE_MB", "1");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("PROJECT_NAME");
    std::env::remove_var("S3_ACCESS_KEY");
    std::env::remove_var("S3_SECRET_KEY");
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let media_dir = tempfile::tempdir().expect("media tempdir");
    let store = Arc::new(InMemoryExamStore::new());

    let state = AppState::new(settings, store.clone(), MediaStorage::local(media_dir.path()));
    let app = api::router::app(state.clone());

    TestContext { state, app, store, media_dir, _guard: guard }
}

pub(crate) fn bearer_token(settings: &Settings, role: UserRole, class: Option<i32>) -> String {
    security::create_access_token("test-user", role, class, settings, None).expect("token")
}

/// Hand-assembled `multipart/form-data` body.
#[derive(Debug, Default)]
pub(crate) struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub(crate) fn file(
        mut self,
        name: &str,
        file_name: &str,
        content_type: &str,
        contents: &[u8],
    ) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(contents);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub(crate) fn into_request(
        mut self,
        method: Method,
        uri: &str,
        token: Option<&str>,
    ) -> Request<Body> {
        self.bytes.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        builder.body(Body::from(self.bytes)).expect("request body")
    }
}

/// Form fields of a valid exam; callers add or drop parts as needed.
pub(crate) fn exam_fields(
    name: &str,
    class: &str,
    exam_type: &str,
    total_marks: &str,
    start_date: &str,
) -> MultipartBody {
    MultipartBody::new()
        .text("name", name)
        .text("class", class)
        .text("examType", exam_type)
        .text("totalMarks", total_marks)
        .text("startDate", start_date)
}

pub(crate) fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    bytes.extend_from_slice(b"timetable");
    bytes
}

pub(crate) fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::empty()).expect("request body")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: &str,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder =
        Request::builder().method(method).uri(uri).header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::from(body.to_string())).expect("request body")
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
