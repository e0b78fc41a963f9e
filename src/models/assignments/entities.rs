use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::files::entities::FileRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 作业截止时间
    pub deadline: DateTime<Utc>,
    // 创建者 ID
    pub created_by: i64,
    // 作业创建时间
    pub created_at: DateTime<Utc>,
    // 作业附件（按上传顺序）
    pub files: Vec<FileRef>,
}

/// 作业状态，不落库，读取时按当前时间推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Closed,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentStatus::Active => write!(f, "active"),
            AssignmentStatus::Closed => write!(f, "closed"),
        }
    }
}

impl Assignment {
    /// 按给定时间推导作业状态：截止前为 active，到点即 closed
    pub fn status_at(&self, now: DateTime<Utc>) -> AssignmentStatus {
        if now < self.deadline {
            AssignmentStatus::Active
        } else {
            AssignmentStatus::Closed
        }
    }

    /// 按原始文件名查找附件
    pub fn find_file(&self, file_name: &str) -> Option<&FileRef> {
        self.files.iter().find(|f| f.file_name == file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assignment_with_deadline(deadline: DateTime<Utc>) -> Assignment {
        Assignment {
            id: 1,
            title: "Lab 1".to_string(),
            description: None,
            deadline,
            created_by: 10,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            files: vec![],
        }
    }

    #[test]
    fn test_status_before_deadline() {
        let deadline = Utc.with_ymd_and_hms(2025, 1, 10, 23, 59, 0).unwrap();
        let a = assignment_with_deadline(deadline);
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 23, 58, 59).unwrap();
        assert_eq!(a.status_at(now), AssignmentStatus::Active);
    }

    #[test]
    fn test_status_at_deadline_is_closed() {
        let deadline = Utc.with_ymd_and_hms(2025, 1, 10, 23, 59, 0).unwrap();
        let a = assignment_with_deadline(deadline);
        assert_eq!(a.status_at(deadline), AssignmentStatus::Closed);
    }

    #[test]
    fn test_status_after_deadline() {
        let deadline = Utc.with_ymd_and_hms(2025, 1, 10, 23, 59, 0).unwrap();
        let a = assignment_with_deadline(deadline);
        let now = Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 1).unwrap();
        assert_eq!(a.status_at(now), AssignmentStatus::Closed);
    }
}
