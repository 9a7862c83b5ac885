use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One row per successful `/extract-skills` call. Only the file name of the upload
/// is kept; skills are stored comma-joined.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub file_name: String,
    pub role: Option<String>,
    pub extracted_skills: String,
    pub recommended_skills: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub file_name: String,
    pub role: Option<String>,
    pub extracted_skills: String,
    pub recommended_skills: Option<String>,
}

impl NewResume {
    /// `recommended` is only stored when a role was given and something came back.
    pub fn new(
        file_name: &str,
        role: Option<&str>,
        extracted: &[String],
        recommended: &[String],
    ) -> Self {
        Self {
            file_name: file_name.to_string(),
            role: role.map(str::to_string),
            extracted_skills: extracted.join(", "),
            recommended_skills: (!recommended.is_empty()).then(|| recommended.join(", ")),
        }
    }
}
