//! 提交实体
//!
//! 评分数据内嵌在提交行中，没有独立的生命周期。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_name: String,
    pub blob_handle: String,
    pub file_size: i64,
    pub submitted_at: i64,
    pub is_late: bool,
    pub status: String,
    pub score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub graded_at: Option<i64>,
    pub graded_by: Option<i64>,
    pub grading_claimed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::files::entities::FileRef;
        use crate::models::submissions::entities::{Grade, Submission, SubmissionStatus};
        use chrono::{DateTime, Utc};

        let status = self
            .status
            .parse::<SubmissionStatus>()
            .unwrap_or(SubmissionStatus::Submitted);

        // 评分字段齐备时才构造 Grade
        let grade = match (self.score, self.graded_at) {
            (Some(score), Some(graded_at)) => Some(Grade {
                score,
                feedback: self.feedback.clone().unwrap_or_default(),
                graded_at: DateTime::<Utc>::from_timestamp(graded_at, 0).unwrap_or_default(),
                graded_by: self.graded_by.unwrap_or_default(),
            }),
            _ => None,
        };

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            file: FileRef {
                file_name: self.file_name,
                blob_handle: self.blob_handle,
                file_size: self.file_size,
            },
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
            is_late: self.is_late,
            status,
            grade,
        }
    }
}
