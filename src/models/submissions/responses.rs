use serde::Serialize;

use crate::models::files::responses::FileInfo;
use crate::models::submissions::entities::{Grade, Submission};

/// 提交中的评分信息
#[derive(Debug, Serialize)]
pub struct GradeInfo {
    pub score: f64,
    pub feedback: String,
    pub graded_at: String,
    pub graded_by: i64,
}

impl From<&Grade> for GradeInfo {
    fn from(grade: &Grade) -> Self {
        Self {
            score: grade.score,
            feedback: grade.feedback.clone(),
            graded_at: grade.graded_at.to_rfc3339(),
            graded_by: grade.graded_by,
        }
    }
}

/// 提交响应
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file: FileInfo,
    pub submitted_at: String,
    pub is_late: bool,
    pub status: String,
    pub grade: Option<GradeInfo>,
}

impl From<&Submission> for SubmissionResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            file: FileInfo::from(&submission.file),
            submitted_at: submission.submitted_at.to_rfc3339(),
            is_late: submission.is_late,
            status: submission.status.to_string(),
            grade: submission.grade.as_ref().map(GradeInfo::from),
        }
    }
}

/// 提交列表响应
#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionResponse>,
    pub total: i64,
}
