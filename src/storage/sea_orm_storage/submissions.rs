//! 提交存储操作
//!
//! 提交唯一性由 (assignment_id, student_id) 唯一索引保证；
//! 评分状态迁移全部走条件更新，避免并发双写。

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{PortalError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::CreateSubmissionRequest,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// 迟交标记按传入的 now 与作业截止时间比较得出（严格大于才算迟交）。
    /// 重复提交依赖唯一索引拦截并映射为 Conflict，读-写竞态下也只会有一行落库。
    pub async fn create_submission_impl(
        &self,
        student_id: i64,
        req: CreateSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        let assignment = self
            .get_assignment_by_id_impl(req.assignment_id)
            .await?
            .ok_or_else(|| {
                PortalError::not_found(format!("作业不存在: {}", req.assignment_id))
            })?;

        let is_late = now > assignment.deadline;

        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(student_id),
            file_name: Set(req.file.file_name),
            blob_handle: Set(req.file.blob_handle),
            file_size: Set(req.file.file_size),
            submitted_at: Set(now.timestamp()),
            is_late: Set(is_late),
            status: Set(SubmissionStatus::Submitted.to_string()),
            ..Default::default()
        };

        let result = match model.insert(&self.db).await {
            Ok(m) => m,
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Err(PortalError::conflict(format!(
                        "学生 {student_id} 已提交过作业 {}",
                        req.assignment_id
                    )));
                }
                return Err(PortalError::database_operation(format!(
                    "创建提交失败: {e}"
                )));
            }
        };

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生对某作业的提交
    pub async fn get_submission_by_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询学生提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出某作业的全部提交（提交时间升序，ID 升序决胜）
    pub async fn list_submissions_impl(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 占用提交用于评分
    ///
    /// 条件更新：submitted 状态、或占用时间早于 TTL 的陈旧 grading 状态才允许占用，
    /// rows_affected 为 0 即占用失败。
    pub async fn claim_grading_impl(
        &self,
        submission_id: i64,
        now: DateTime<Utc>,
        claim_ttl: u64,
    ) -> Result<bool> {
        let stale_before = now.timestamp() - claim_ttl as i64;

        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Grading.to_string()),
            )
            .col_expr(Column::GradingClaimedAt, Expr::value(now.timestamp()))
            .filter(Column::Id.eq(submission_id))
            .filter(
                Condition::any()
                    .add(Column::Status.eq(SubmissionStatus::Submitted.to_string()))
                    .add(
                        Condition::all()
                            .add(Column::Status.eq(SubmissionStatus::Grading.to_string()))
                            .add(Column::GradingClaimedAt.lt(stale_before)),
                    ),
            )
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("占用评分失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 释放评分占用（grading → submitted）
    pub async fn release_grading_claim_impl(&self, submission_id: i64) -> Result<bool> {
        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Submitted.to_string()),
            )
            .col_expr(Column::GradingClaimedAt, Expr::value(None::<i64>))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.eq(SubmissionStatus::Grading.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("释放评分占用失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 写入评分并进入终态（grading → graded）
    pub async fn record_grade_impl(
        &self,
        submission_id: i64,
        score: f64,
        feedback: &str,
        graded_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Graded.to_string()),
            )
            .col_expr(Column::Score, Expr::value(score))
            .col_expr(Column::Feedback, Expr::value(feedback.to_string()))
            .col_expr(Column::GradedAt, Expr::value(now.timestamp()))
            .col_expr(Column::GradedBy, Expr::value(graded_by))
            .col_expr(Column::GradingClaimedAt, Expr::value(None::<i64>))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.eq(SubmissionStatus::Grading.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("写入评分失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(PortalError::conflict(format!(
                "提交 {submission_id} 不在评分占用状态，评分未写入"
            )));
        }

        self.get_submission_by_id_impl(submission_id)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("提交不存在: {submission_id}")))
    }
}
