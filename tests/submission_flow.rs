//! 提交台账行为：唯一性、迟交判定、排序与文件往返

mod common;

use common::*;

use campus_assignments::models::assignments::{
    entities::AssignmentStatus, requests::CreateAssignmentRequest,
};
use campus_assignments::models::submissions::{
    entities::SubmissionStatus, requests::CreateSubmissionRequest,
};

#[tokio::test]
async fn duplicate_submission_conflicts_and_keeps_original() {
    let storage = memory_storage().await;
    let blob = temp_blob_store();
    let deadline = utc(2025, 1, 10, 23, 59, 0);
    let assignment_id = seed_assignment(&storage, deadline, utc(2025, 1, 1, 8, 0, 0)).await;

    let first_handle = blob.put(b"print('v1')").await.unwrap();
    let first = storage
        .create_submission(
            7,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("main.py", &first_handle, 11),
            },
            utc(2025, 1, 5, 12, 0, 0),
        )
        .await
        .unwrap();

    // 第二次提交必须失败，且不得覆盖第一次
    let second_handle = blob.put(b"print('v2')").await.unwrap();
    let err = storage
        .create_submission(
            7,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("main_v2.py", &second_handle, 11),
            },
            utc(2025, 1, 6, 12, 0, 0),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E003");

    let stored = storage
        .get_submission_by_student(assignment_id, 7)
        .await
        .unwrap()
        .expect("original submission must survive");
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.submitted_at, first.submitted_at);
    assert_eq!(stored.file, first.file);

    // 其他学生不受影响
    let other_handle = blob.put(b"print('other')").await.unwrap();
    storage
        .create_submission(
            8,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("main.py", &other_handle, 14),
            },
            utc(2025, 1, 6, 13, 0, 0),
        )
        .await
        .expect("a different student may still submit");
}

#[tokio::test]
async fn lateness_is_computed_against_deadline() {
    let storage = memory_storage().await;
    let deadline = utc(2025, 1, 10, 23, 59, 0);
    let assignment_id = seed_assignment(&storage, deadline, utc(2025, 1, 1, 8, 0, 0)).await;

    // 截止之前：不迟交
    let early = storage
        .create_submission(
            1,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("a.py", "h-early", 1),
            },
            utc(2025, 1, 10, 12, 0, 0),
        )
        .await
        .unwrap();
    assert!(!early.is_late);

    // 恰好等于截止时间：不算迟交
    let boundary = storage
        .create_submission(
            2,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("b.py", "h-boundary", 1),
            },
            deadline,
        )
        .await
        .unwrap();
    assert!(!boundary.is_late);

    // 截止之后一秒：迟交，但仍被接受
    let late = storage
        .create_submission(
            3,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("c.py", "h-late", 1),
            },
            utc(2025, 1, 11, 0, 0, 1),
        )
        .await
        .unwrap();
    assert!(late.is_late);
    assert_eq!(late.status, SubmissionStatus::Submitted);
}

#[tokio::test]
async fn submit_to_unknown_assignment_is_not_found() {
    let storage = memory_storage().await;

    let err = storage
        .create_submission(
            1,
            CreateSubmissionRequest {
                assignment_id: 999,
                file: file_ref("a.py", "h", 1),
            },
            utc(2025, 1, 5, 12, 0, 0),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E002");
}

#[tokio::test]
async fn missing_submission_is_none_not_default() {
    let storage = memory_storage().await;
    let assignment_id =
        seed_assignment(&storage, utc(2025, 1, 10, 23, 59, 0), utc(2025, 1, 1, 8, 0, 0)).await;

    let missing = storage
        .get_submission_by_student(assignment_id, 42)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn submissions_are_listed_in_submission_order() {
    let storage = memory_storage().await;
    let assignment_id =
        seed_assignment(&storage, utc(2025, 1, 10, 23, 59, 0), utc(2025, 1, 1, 8, 0, 0)).await;

    // 乱序写入三个学生的提交
    for (student_id, hour) in [(3_i64, 15_u32), (1, 9), (2, 12)] {
        storage
            .create_submission(
                student_id,
                CreateSubmissionRequest {
                    assignment_id,
                    file: file_ref("a.py", &format!("h-{student_id}"), 1),
                },
                utc(2025, 1, 5, hour, 0, 0),
            )
            .await
            .unwrap();
    }

    let listed = storage.list_submissions(assignment_id).await.unwrap();
    let students: Vec<i64> = listed.iter().map(|s| s.student_id).collect();
    assert_eq!(students, vec![1, 2, 3]);

    // 同一时刻的提交按插入顺序稳定排序
    let assignment2 =
        seed_assignment(&storage, utc(2025, 2, 10, 23, 59, 0), utc(2025, 2, 1, 8, 0, 0)).await;
    let same_instant = utc(2025, 2, 5, 10, 0, 0);
    for student_id in [5_i64, 6, 7] {
        storage
            .create_submission(
                student_id,
                CreateSubmissionRequest {
                    assignment_id: assignment2,
                    file: file_ref("a.py", &format!("t-{student_id}"), 1),
                },
                same_instant,
            )
            .await
            .unwrap();
    }
    let listed = storage.list_submissions(assignment2).await.unwrap();
    let students: Vec<i64> = listed.iter().map(|s| s.student_id).collect();
    assert_eq!(students, vec![5, 6, 7]);
}

#[tokio::test]
async fn submitted_file_round_trips_byte_exact() {
    let storage = memory_storage().await;
    let blob = temp_blob_store();
    let assignment_id =
        seed_assignment(&storage, utc(2025, 1, 10, 23, 59, 0), utc(2025, 1, 1, 8, 0, 0)).await;

    let content: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    let handle = blob.put(&content).await.unwrap();

    let submission = storage
        .create_submission(
            9,
            CreateSubmissionRequest {
                assignment_id,
                file: file_ref("solution.bin", &handle, content.len() as i64),
            },
            utc(2025, 1, 5, 12, 0, 0),
        )
        .await
        .unwrap();

    let fetched = storage
        .get_submission_by_id(submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.file.file_name, "solution.bin");

    let bytes = blob.get(&fetched.file.blob_handle).await.unwrap();
    assert_eq!(bytes, content);
}

#[tokio::test]
async fn assignment_creation_is_atomic_and_ordered() {
    let storage = memory_storage().await;

    let created = storage
        .create_assignment(
            100,
            CreateAssignmentRequest {
                title: "Lab 2".to_string(),
                description: None,
                deadline: utc(2025, 3, 1, 0, 0, 0),
                files: vec![
                    file_ref("handout.pdf", "h-1", 10),
                    file_ref("starter.zip", "h-2", 20),
                    file_ref("rubric.md", "h-3", 30),
                ],
            },
            utc(2025, 2, 1, 8, 0, 0),
        )
        .await
        .unwrap();

    let fetched = storage
        .get_assignment_by_id(created.id)
        .await
        .unwrap()
        .unwrap();

    // 附件保持上传顺序
    let names: Vec<&str> = fetched.files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["handout.pdf", "starter.zip", "rubric.md"]);

    // 状态按读取时刻推导
    assert_eq!(
        fetched.status_at(utc(2025, 2, 15, 0, 0, 0)),
        AssignmentStatus::Active
    );
    assert_eq!(
        fetched.status_at(utc(2025, 3, 1, 0, 0, 0)),
        AssignmentStatus::Closed
    );
}

#[tokio::test]
async fn assignments_list_newest_first() {
    let storage = memory_storage().await;

    for (title, day) in [("A", 1_u32), ("B", 3), ("C", 2)] {
        storage
            .create_assignment(
                100,
                CreateAssignmentRequest {
                    title: title.to_string(),
                    description: None,
                    deadline: utc(2025, 6, 30, 0, 0, 0),
                    files: vec![],
                },
                utc(2025, 6, day, 8, 0, 0),
            )
            .await
            .unwrap();
    }

    let listed = storage.list_assignments().await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "C", "A"]);
}
