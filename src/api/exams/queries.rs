use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListExamsQuery {
    /// Accepted for compatibility with existing clients; not used for filtering.
    #[serde(default)]
    #[allow(dead_code)]
    pub(super) search: Option<String>,
    #[serde(default)]
    #[serde(alias = "exam_type")]
    #[serde(rename = "examType")]
    pub(super) exam_type: Option<String>,
    #[serde(default)]
    pub(super) class: Option<String>,
}
