//! 评分编排行为：幂等、并发去重、失败可重试与占用过期

mod common;

use common::*;

use std::sync::Arc;
use std::time::Duration;

use campus_assignments::blob::BlobStore;
use campus_assignments::grading::{Grader, GradingOrchestrator};
use campus_assignments::models::submissions::{
    entities::SubmissionStatus, requests::CreateSubmissionRequest,
};
use campus_assignments::storage::Storage;
use campus_assignments::utils::clock::Clock;

struct GradingWorld {
    storage: Arc<dyn Storage>,
    blob: Arc<dyn BlobStore>,
    clock: Arc<FixedClock>,
    assignment_id: i64,
    submission_id: i64,
}

/// 一个作业 + 一条迟交的提交（截止 23:59，次日 00:00:01 提交）
async fn grading_world() -> GradingWorld {
    let storage = memory_storage().await;
    let blob = temp_blob_store();
    let deadline = utc(2025, 1, 10, 23, 59, 0);
    let assignment_id = seed_assignment(&storage, deadline, utc(2025, 1, 1, 8, 0, 0)).await;

    let handle = blob.put(b"def solve():\n    return 42\n").await.unwrap();
    let submission = storage
        .create_submission(
            7,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("main.py", &handle, 27),
            },
            utc(2025, 1, 11, 0, 0, 1),
        )
        .await
        .unwrap();
    assert!(submission.is_late);

    GradingWorld {
        storage,
        blob,
        clock: Arc::new(FixedClock::at(utc(2025, 1, 12, 9, 0, 0))),
        assignment_id,
        submission_id: submission.id,
    }
}

fn orchestrator_with(world: &GradingWorld, grader: Arc<dyn Grader>) -> GradingOrchestrator {
    GradingOrchestrator::with_params(
        world.storage.clone(),
        world.blob.clone(),
        grader,
        world.clock.clone() as Arc<dyn Clock>,
        Duration::from_secs(5),
        3600,
    )
}

#[tokio::test]
async fn late_submission_is_graded_exactly_once() {
    let world = grading_world().await;
    let grader = Arc::new(CountingGrader::returning(
        78.5,
        "Good structure, missing edge-case handling",
    ));
    let orchestrator = orchestrator_with(&world, grader.clone());

    let grade = orchestrator
        .grade(world.assignment_id, world.submission_id, 100)
        .await
        .unwrap();
    assert_eq!(grade.score, 78.5);
    assert_eq!(grade.feedback, "Good structure, missing edge-case handling");
    assert_eq!(grade.graded_by, 100);

    // 落库的提交进入终态并携带评分
    let stored = world
        .storage
        .get_submission_by_id(world.submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Graded);
    assert_eq!(stored.grade.as_ref().unwrap().score, 78.5);

    // 重复评分返回同一份结果，不再触发评分器
    let again = orchestrator
        .grade(world.assignment_id, world.submission_id, 101)
        .await
        .unwrap();
    assert_eq!(again, grade);
    assert_eq!(grader.call_count(), 1);
}

#[tokio::test]
async fn sequential_grading_is_idempotent() {
    let world = grading_world().await;
    let grader = Arc::new(CountingGrader::returning(91.0, "ok"));
    let orchestrator = orchestrator_with(&world, grader.clone());

    let mut scores = Vec::new();
    for _ in 0..5 {
        let grade = orchestrator
            .grade(world.assignment_id, world.submission_id, 100)
            .await
            .unwrap();
        scores.push(grade.score);
    }

    assert_eq!(scores, vec![91.0; 5]);
    assert_eq!(grader.call_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_grading_invokes_grader_once() {
    let world = grading_world().await;
    // 人为放慢评分器，保证并发调用真正重叠
    let grader = Arc::new(
        CountingGrader::returning(66.0, "slow path").with_delay(Duration::from_millis(100)),
    );
    let orchestrator = Arc::new(orchestrator_with(&world, grader.clone()));

    let mut handles = Vec::new();
    for caller in 0..8 {
        let orchestrator = orchestrator.clone();
        let assignment_id = world.assignment_id;
        let submission_id = world.submission_id;
        handles.push(tokio::spawn(async move {
            orchestrator
                .grade(assignment_id, submission_id, 100 + caller)
                .await
        }));
    }

    let mut grades = Vec::new();
    for handle in handles {
        grades.push(handle.await.unwrap().expect("every caller must succeed"));
    }

    // 所有调用者拿到同一份评分，评分器只被调用一次
    assert_eq!(grader.call_count(), 1);
    for grade in &grades {
        assert_eq!(grade.score, 66.0);
        assert_eq!(*grade, grades[0]);
    }
}

#[tokio::test]
async fn failed_grading_leaves_submission_retryable() {
    let world = grading_world().await;
    let orchestrator = orchestrator_with(&world, Arc::new(FailingGrader));

    let err = orchestrator
        .grade(world.assignment_id, world.submission_id, 100)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 失败后回到 submitted，占用已释放
    let stored = world
        .storage
        .get_submission_by_id(world.submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Submitted);
    assert!(stored.grade.is_none());

    // 换一个可用的评分器重试即可成功
    let grader = Arc::new(CountingGrader::returning(80.0, "recovered"));
    let retry = orchestrator_with(&world, grader.clone());
    let grade = retry
        .grade(world.assignment_id, world.submission_id, 100)
        .await
        .unwrap();
    assert_eq!(grade.score, 80.0);
    assert_eq!(grader.call_count(), 1);
}

#[tokio::test]
async fn grader_timeout_surfaces_as_grading_failed() {
    let world = grading_world().await;
    let grader = Arc::new(
        CountingGrader::returning(50.0, "too slow").with_delay(Duration::from_secs(600)),
    );
    let orchestrator = GradingOrchestrator::with_params(
        world.storage.clone(),
        world.blob.clone(),
        grader,
        world.clock.clone() as Arc<dyn Clock>,
        Duration::from_millis(50),
        3600,
    );

    let err = orchestrator
        .grade(world.assignment_id, world.submission_id, 100)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    let stored = world
        .storage
        .get_submission_by_id(world.submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Submitted);
}

#[tokio::test]
async fn out_of_range_score_is_rejected_not_clamped() {
    let world = grading_world().await;
    let grader = Arc::new(CountingGrader::returning(150.0, "broken scorer"));
    let orchestrator = orchestrator_with(&world, grader.clone());

    let err = orchestrator
        .grade(world.assignment_id, world.submission_id, 100)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E004");

    // 越界分数不得以任何形式落库
    let stored = world
        .storage
        .get_submission_by_id(world.submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Submitted);
    assert!(stored.grade.is_none());
}

#[tokio::test]
async fn grading_unknown_submission_is_not_found() {
    let world = grading_world().await;
    let orchestrator = orchestrator_with(&world, Arc::new(CountingGrader::returning(60.0, "x")));

    let err = orchestrator
        .grade(world.assignment_id, 9999, 100)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");

    // 属于别的作业的提交同样按不存在处理
    let err = orchestrator
        .grade(world.assignment_id + 1, world.submission_id, 100)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");
}

#[tokio::test]
async fn stale_claim_can_be_reclaimed_after_ttl() {
    let world = grading_world().await;
    let storage = &world.storage;
    let claim_ttl = 3600_u64;

    // 第一次占用成功
    let t0 = utc(2025, 1, 12, 9, 0, 0);
    assert!(
        storage
            .claim_grading(world.submission_id, t0, claim_ttl)
            .await
            .unwrap()
    );

    // TTL 之内重复占用失败
    let t1 = utc(2025, 1, 12, 9, 10, 0);
    assert!(
        !storage
            .claim_grading(world.submission_id, t1, claim_ttl)
            .await
            .unwrap()
    );

    // 占用方假死，TTL 过期后允许重新占用
    let t2 = utc(2025, 1, 12, 11, 0, 0);
    assert!(
        storage
            .claim_grading(world.submission_id, t2, claim_ttl)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn grade_cannot_be_recorded_without_claim() {
    let world = grading_world().await;

    // 未占用直接写评分：条件更新不命中
    let err = world
        .storage
        .record_grade(world.submission_id, 88.0, "no claim", 100, utc(2025, 1, 12, 9, 0, 0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E003");

    let stored = world
        .storage
        .get_submission_by_id(world.submission_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Submitted);
    assert!(stored.grade.is_none());
}
