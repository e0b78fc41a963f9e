use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::files::entities::FileRef;

/// 提交状态机：submitted → grading → graded
///
/// grading 是评分占用态，持有者在调用外部评分器；
/// graded 为终态，评分一经写入不再变更。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Grading,
    Graded,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Grading => write!(f, "grading"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(SubmissionStatus::Submitted),
            "grading" => Ok(SubmissionStatus::Grading),
            "graded" => Ok(SubmissionStatus::Graded),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// 评分结果，内嵌在提交中，写入后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub score: f64,
    pub feedback: String,
    pub graded_at: DateTime<Utc>,
    // 触发评分的操作者 ID
    pub graded_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    // 唯一 ID
    pub id: i64,
    // 关联的作业 ID
    pub assignment_id: i64,
    // 提交学生 ID
    pub student_id: i64,
    // 提交文件
    pub file: FileRef,
    // 提交时间
    pub submitted_at: DateTime<Utc>,
    // 是否迟交（提交时刻与截止时间比较，一经计算不可变）
    pub is_late: bool,
    // 状态
    pub status: SubmissionStatus,
    // 评分（仅 graded 状态存在）
    pub grade: Option<Grade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubmissionStatus::Submitted,
            SubmissionStatus::Grading,
            SubmissionStatus::Graded,
        ] {
            assert_eq!(status.to_string().parse::<SubmissionStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("pending".parse::<SubmissionStatus>().is_err());
    }
}
