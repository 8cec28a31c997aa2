use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::db::types::ExamType;

use super::form::SelectedFile;

/// Shown when a failed response carries no usable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }

    /// Text suitable for a notification.
    pub fn user_message(&self) -> String {
        self.message_or(FALLBACK_ERROR_MESSAGE)
    }

    /// The server's message, or `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleRecord {
    pub subject: SubjectRecord,
}

/// An exam as the server returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    pub id: String,
    pub name: String,
    pub class: i32,
    pub exam_type: ExamType,
    pub total_marks: i32,
    pub start_date: String,
    #[serde(default)]
    pub timetable_link: Option<String>,
    #[serde(default)]
    pub schedules: Vec<ScheduleRecord>,
}

/// Multipart payload for create and update. Values are sent as typed in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamSubmission {
    pub name: String,
    pub class: String,
    pub exam_type: String,
    pub total_marks: String,
    pub start_date: String,
    pub file: Option<SelectedFile>,
}

/// Payload and message of a successful envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub data: T,
    pub message: String,
}

#[async_trait]
pub trait ExamApi: Send + Sync {
    async fn list(&self, class: Option<i32>) -> Result<Vec<ExamRecord>, ClientError>;

    async fn create(&self, submission: ExamSubmission) -> Result<Reply<ExamRecord>, ClientError>;

    async fn update(
        &self,
        id: &str,
        submission: ExamSubmission,
    ) -> Result<Reply<ExamRecord>, ClientError>;

    async fn delete(&self, id: &str) -> Result<Reply<Option<ExamRecord>>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// [`ExamApi`] over HTTP. Every request carries `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct HttpExamApi {
    client: Client,
    exams_url: String,
    token: String,
}

impl HttpExamApi {
    /// `api_base` is the server origin plus API prefix, e.g. `http://host:4000/api`.
    pub fn new(api_base: &str, token: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            exams_url: format!("{}/exam", api_base.trim_end_matches('/')),
            token: token.into(),
        })
    }

    fn exam_url(&self, id: &str) -> String {
        format!("{}/{}", self.exams_url, id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<(Option<T>, String), ClientError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|err| ClientError::Decode(format!("{err}: {body}")))?;
        if !envelope.success {
            return Err(ClientError::Status { status: status.as_u16(), message: envelope.message });
        }

        Ok((envelope.data, envelope.message))
    }

    async fn send_exam(&self, request: RequestBuilder) -> Result<Reply<ExamRecord>, ClientError> {
        let (data, message) = self.send::<ExamRecord>(request).await?;
        let data = data.ok_or_else(|| ClientError::Decode("missing exam in response".into()))?;
        Ok(Reply { data, message })
    }
}

#[async_trait]
impl ExamApi for HttpExamApi {
    async fn list(&self, class: Option<i32>) -> Result<Vec<ExamRecord>, ClientError> {
        let mut request = self.client.get(&self.exams_url);
        if let Some(class) = class {
            request = request.query(&[("class", class)]);
        }

        let (data, _) = self.send::<Vec<ExamRecord>>(request).await?;
        Ok(data.unwrap_or_default())
    }

    async fn create(&self, submission: ExamSubmission) -> Result<Reply<ExamRecord>, ClientError> {
        let form = multipart_form(submission)?;
        self.send_exam(self.client.post(&self.exams_url).multipart(form)).await
    }

    async fn update(
        &self,
        id: &str,
        submission: ExamSubmission,
    ) -> Result<Reply<ExamRecord>, ClientError> {
        let form = multipart_form(submission)?;
        self.send_exam(self.client.patch(self.exam_url(id)).multipart(form)).await
    }

    async fn delete(&self, id: &str) -> Result<Reply<Option<ExamRecord>>, ClientError> {
        let (data, message) = self.send::<ExamRecord>(self.client.delete(self.exam_url(id))).await?;
        Ok(Reply { data, message })
    }
}

fn multipart_form(submission: ExamSubmission) -> Result<Form, ClientError> {
    let mut form = Form::new()
        .text("name", submission.name)
        .text("class", submission.class)
        .text("examType", submission.exam_type)
        .text("totalMarks", submission.total_marks)
        .text("startDate", submission.start_date);

    if let Some(file) = submission.file {
        let part = Part::bytes(file.bytes).file_name(file.file_name).mime_str(&file.content_type)?;
        form = form.part("file", part);
    }

    Ok(form)
}

fn status_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_default();
    ClientError::Status { status: status.as_u16(), message }
}
