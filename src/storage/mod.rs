use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    submissions::{entities::Submission, requests::CreateSubmissionRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建作业（标题、描述、截止时间与附件元数据一次性落库）
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Assignment>;
    // 通过ID获取作业（含附件列表）
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出作业
    async fn list_assignments(&self) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 创建提交；同一 (作业, 学生) 已有提交时返回 Conflict，迟交标记按 now 计算
    async fn create_submission(
        &self,
        student_id: i64,
        req: CreateSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取学生对某作业的提交
    async fn get_submission_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 列出某作业的全部提交（按提交时间升序，插入顺序决胜）
    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;

    /// 评分状态机方法
    // 占用提交用于评分：submitted → grading 的条件写；
    // 超过 claim_ttl 的陈旧占用允许被重新占用。返回是否占用成功。
    async fn claim_grading(
        &self,
        submission_id: i64,
        now: DateTime<Utc>,
        claim_ttl: u64,
    ) -> Result<bool>;
    // 释放评分占用：grading → submitted，评分失败后调用以便重试
    async fn release_grading_claim(&self, submission_id: i64) -> Result<bool>;
    // 写入评分并进入终态：grading → graded 的条件写，返回更新后的提交
    async fn record_grade(
        &self,
        submission_id: i64,
        score: f64,
        feedback: &str,
        graded_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Submission>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
