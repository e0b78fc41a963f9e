use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::assignments::entities::Assignment;
use crate::models::files::responses::FileInfo;

/// 作业响应（状态按读取时刻推导）
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: String,
    pub status: String,
    pub created_by: i64,
    pub created_at: String,
    pub files: Vec<FileInfo>,
}

impl AssignmentResponse {
    pub fn from_assignment(assignment: &Assignment, now: DateTime<Utc>) -> Self {
        Self {
            id: assignment.id,
            title: assignment.title.clone(),
            description: assignment.description.clone(),
            deadline: assignment.deadline.to_rfc3339(),
            status: assignment.status_at(now).to_string(),
            created_by: assignment.created_by,
            created_at: assignment.created_at.to_rfc3339(),
            files: assignment.files.iter().map(FileInfo::from).collect(),
        }
    }
}

/// 作业列表响应
#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub items: Vec<AssignmentResponse>,
    pub total: i64,
}
