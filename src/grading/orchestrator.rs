//! 评分编排器
//!
//! 核心约束：每个提交至多执行一次评分。
//! 进程内用按提交粒度的异步锁串行化；跨进程用存储层的条件占用写
//! （submitted → grading，带 TTL 的陈旧占用可被重新占用）。
//! 对已评分提交的重复调用直接返回既有评分，不再触发评分器。

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::blob::BlobStore;
use crate::config::GradingConfig;
use crate::errors::{PortalError, Result};
use crate::grading::grader::{Grader, GraderRequest};
use crate::models::submissions::entities::{Grade, Submission};
use crate::storage::Storage;
use crate::utils::clock::Clock;

pub struct GradingOrchestrator {
    storage: Arc<dyn Storage>,
    blob: Arc<dyn BlobStore>,
    grader: Arc<dyn Grader>,
    clock: Arc<dyn Clock>,
    grader_timeout: Duration,
    claim_ttl: u64,
    // 按提交粒度的进程内锁，避免一把全局锁拖住不相关的提交
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl GradingOrchestrator {
    pub fn new(
        storage: Arc<dyn Storage>,
        blob: Arc<dyn BlobStore>,
        grader: Arc<dyn Grader>,
        clock: Arc<dyn Clock>,
        config: &GradingConfig,
    ) -> Self {
        Self::with_params(
            storage,
            blob,
            grader,
            clock,
            Duration::from_secs(config.timeout),
            config.claim_ttl,
        )
    }

    pub fn with_params(
        storage: Arc<dyn Storage>,
        blob: Arc<dyn BlobStore>,
        grader: Arc<dyn Grader>,
        clock: Arc<dyn Clock>,
        grader_timeout: Duration,
        claim_ttl: u64,
    ) -> Self {
        Self {
            storage,
            blob,
            grader,
            clock,
            grader_timeout,
            claim_ttl,
            locks: DashMap::new(),
        }
    }

    /// 为提交评分
    ///
    /// 幂等：已评分的提交直接返回既有评分；并发调用中只有占用成功者
    /// 调用评分器，其余调用者在锁后重新读取并得到同一份评分。
    pub async fn grade(
        &self,
        assignment_id: i64,
        submission_id: i64,
        triggered_by: i64,
    ) -> Result<Grade> {
        let lock = self
            .locks
            .entry(submission_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let submission = self.fetch_submission(assignment_id, submission_id).await?;

        // 幂等入口：已有评分直接返回，不触发评分器
        if let Some(grade) = &submission.grade {
            return Ok(grade.clone());
        }

        let claimed = self
            .storage
            .claim_grading(submission_id, self.clock.now(), self.claim_ttl)
            .await?;

        if !claimed {
            // 占用失败：可能别的进程刚写完评分
            let current = self.fetch_submission(assignment_id, submission_id).await?;
            if let Some(grade) = current.grade {
                return Ok(grade);
            }
            return Err(PortalError::grading_failed(format!(
                "提交 {submission_id} 的评分正在进行中，请稍后重试"
            )));
        }

        // 占用已拿到，评分调用本身不持任何数据库锁
        match self.run_grader(&submission, triggered_by).await {
            Ok(grade) => {
                self.locks.remove(&submission_id);
                Ok(grade)
            }
            Err(e) => {
                // 失败时释放占用，让重试从幂等入口重新开始
                self.release_claim(submission_id).await;
                Err(e)
            }
        }
    }

    async fn fetch_submission(
        &self,
        assignment_id: i64,
        submission_id: i64,
    ) -> Result<Submission> {
        let submission = self
            .storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("提交不存在: {submission_id}")))?;

        // 提交必须属于给定的作业
        if submission.assignment_id != assignment_id {
            return Err(PortalError::not_found(format!(
                "作业 {assignment_id} 下不存在提交 {submission_id}"
            )));
        }

        Ok(submission)
    }

    async fn run_grader(&self, submission: &Submission, triggered_by: i64) -> Result<Grade> {
        let assignment = self
            .storage
            .get_assignment_by_id(submission.assignment_id)
            .await?
            .ok_or_else(|| {
                PortalError::not_found(format!("作业不存在: {}", submission.assignment_id))
            })?;

        let content = self.blob.get(&submission.file.blob_handle).await?;

        let request = GraderRequest {
            assignment_title: assignment.title,
            assignment_description: assignment.description,
            file_name: submission.file.file_name.clone(),
            content,
        };

        let verdict = match tokio::time::timeout(self.grader_timeout, self.grader.score(request))
            .await
        {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                return Err(PortalError::grading_failed(format!("评分器调用失败: {e}")));
            }
            Err(_) => {
                return Err(PortalError::grading_failed(format!(
                    "评分器超时（{}s）",
                    self.grader_timeout.as_secs()
                )));
            }
        };

        // 分数越界按评分器故障处理，不做静默截断
        if !(0.0..=100.0).contains(&verdict.score) {
            return Err(PortalError::grading_failed(format!(
                "评分器返回越界分数: {}",
                verdict.score
            )));
        }

        let graded = self
            .storage
            .record_grade(
                submission.id,
                verdict.score,
                &verdict.feedback,
                triggered_by,
                self.clock.now(),
            )
            .await?;

        info!(
            "Submission {} graded: score={}, triggered_by={}",
            submission.id, verdict.score, triggered_by
        );

        graded
            .grade
            .ok_or_else(|| PortalError::database_operation("评分写入后读取为空".to_string()))
    }

    async fn release_claim(&self, submission_id: i64) {
        if let Err(e) = self.storage.release_grading_claim(submission_id).await {
            // 释放失败时占用会在 TTL 过期后被重新占用
            warn!(
                "Failed to release grading claim for submission {}: {}",
                submission_id, e
            );
        }
    }
}
