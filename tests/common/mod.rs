//! 集成测试公共设施：内存数据库、固定时钟与脚本化评分器

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use campus_assignments::blob::{BlobStore, LocalBlobStore};
use campus_assignments::errors::{PortalError, Result};
use campus_assignments::grading::{Grader, GraderRequest, GraderVerdict};
use campus_assignments::models::assignments::requests::CreateAssignmentRequest;
use campus_assignments::models::files::entities::FileRef;
use campus_assignments::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use campus_assignments::utils::clock::Clock;

/// 每个测试一个独立的内存数据库（单连接，避免内存库被连接池分裂）
pub async fn memory_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::new_with_url(":memory:", 1, 5)
        .await
        .expect("failed to create in-memory storage");
    Arc::new(storage)
}

/// 每个测试一个独立的临时目录字节存储
pub fn temp_blob_store() -> Arc<dyn BlobStore> {
    let dir = std::env::temp_dir().join(format!("campus-assignments-test-{}", Uuid::new_v4()));
    Arc::new(LocalBlobStore::new(dir).expect("failed to create blob store"))
}

/// 可拨动的固定时钟
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// 记录调用次数并返回固定结论的评分器
pub struct CountingGrader {
    pub calls: AtomicUsize,
    verdict: GraderVerdict,
    delay: Option<Duration>,
}

impl CountingGrader {
    pub fn returning(score: f64, feedback: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            verdict: GraderVerdict {
                score,
                feedback: feedback.to_string(),
            },
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Grader for CountingGrader {
    async fn score(&self, _request: GraderRequest) -> Result<GraderVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.verdict.clone())
    }
}

/// 始终失败的评分器
pub struct FailingGrader;

#[async_trait]
impl Grader for FailingGrader {
    async fn score(&self, _request: GraderRequest) -> Result<GraderVerdict> {
        Err(PortalError::grading_failed("scorer unavailable"))
    }
}

pub fn file_ref(file_name: &str, blob_handle: &str, file_size: i64) -> FileRef {
    FileRef {
        file_name: file_name.to_string(),
        blob_handle: blob_handle.to_string(),
        file_size,
    }
}

/// 建一个无附件作业，返回其 ID
pub async fn seed_assignment(
    storage: &Arc<dyn Storage>,
    deadline: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> i64 {
    let assignment = storage
        .create_assignment(
            100,
            CreateAssignmentRequest {
                title: "Lab 1".to_string(),
                description: Some("Implement the parser".to_string()),
                deadline,
                files: vec![],
            },
            created_at,
        )
        .await
        .expect("failed to seed assignment");
    assignment.id
}
