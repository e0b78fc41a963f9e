use chrono::{DateTime, Utc};

use crate::models::files::entities::FileRef;

/// 创建作业请求
///
/// 由 multipart 表单字段在业务层组装；附件字节此时已写入字节存储。
#[derive(Debug, Clone)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
    pub files: Vec<FileRef>,
}
