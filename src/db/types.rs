use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "examtype", rename_all = "lowercase")]
pub enum ExamType {
    Mid,
    End,
}

impl ExamType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExamType::Mid => "mid",
            ExamType::End => "end",
        }
    }

    /// Label shown next to an exam in lists and cards.
    pub fn label(self) -> &'static str {
        match self {
            ExamType::Mid => "Mid Term",
            ExamType::End => "End Term",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "mid" => Ok(ExamType::Mid),
            "end" => Ok(ExamType::End),
            other => Err(format!("examType must be 'mid' or 'end', got '{other}'")),
        }
    }
}

/// Roles carried in bearer tokens. Spelled the way the login screen stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Faculty,
    Student,
}

impl UserRole {
    pub fn is_student(self) -> bool {
        matches!(self, UserRole::Student)
    }
}
