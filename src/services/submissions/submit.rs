use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;

use super::SubmissionService;
use crate::config::AppConfig;
use crate::errors::PortalError;
use crate::models::files::entities::FileRef;
use crate::models::submissions::{requests::CreateSubmissionRequest, responses::SubmissionResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, read_field_bytes};
use crate::utils::validate::sanitize_filename;

/// 学生提交作业
/// POST /assignments/{id}/submissions
///
/// multipart 表单携带单个 file 字段。同一 (作业, 学生) 只允许一次提交，
/// 重复提交返回 409 并带回已存在的提交；迟交照常接受并打标记。
pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    student_id: i64,
    assignment_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.blob.max_file_size;

    let storage = service.get_storage(request);
    let blob = crate::services::get_blob_store(request);
    let clock = crate::services::get_clock(request);

    // 解析上传的单个文件
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name == "file" {
            if uploaded.is_some() {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "Only one file can be uploaded at a time",
                )));
            }

            let original = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string())
                .unwrap_or_default();

            let file_name = match sanitize_filename(&original) {
                Ok(name) => name,
                Err(e) => return Ok(error_response(&e)),
            };

            let bytes = match read_field_bytes(&mut field, max_size).await {
                Ok(bytes) => bytes,
                Err(e) => return Ok(error_response(&e)),
            };

            uploaded = Some((file_name, bytes));
        }
    }

    let Some((file_name, bytes)) = uploaded else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "No file found in upload payload",
        )));
    };

    // 字节先持久化，提交记录后落库；落库失败则回收字节
    let blob_handle = match blob.put(&bytes).await {
        Ok(handle) => handle,
        Err(e) => return Ok(error_response(&e)),
    };

    let req = CreateSubmissionRequest {
        assignment_id,
        file: FileRef {
            file_name,
            blob_handle: blob_handle.clone(),
            file_size: bytes.len() as i64,
        },
    };

    match storage.create_submission(student_id, req, clock.now()).await {
        Ok(submission) => Ok(HttpResponse::Created().json(ApiResponse::success(
            SubmissionResponse::from(&submission),
            "提交成功",
        ))),
        Err(e) => {
            let _ = blob.remove(&blob_handle).await;

            // 重复提交：带回已存在的提交，原记录保持不变
            if matches!(e, PortalError::Conflict(_))
                && let Ok(Some(existing)) = storage
                    .get_submission_by_student(assignment_id, student_id)
                    .await
            {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error(
                    ErrorCode::DuplicateSubmission,
                    SubmissionResponse::from(&existing),
                    e.message(),
                )));
            }

            Ok(error_response(&e))
        }
    }
}
