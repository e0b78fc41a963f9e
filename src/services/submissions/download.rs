use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::SubmissionService;
use crate::middlewares::RequireIdentity;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 下载提交文件（返回逐字节一致的内容与原始文件名）
/// GET /assignments/{id}/submissions/{submission_id}/download
pub async fn download_file(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let blob = crate::services::get_blob_store(request);

    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
    };

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) if submission.assignment_id == assignment_id => submission,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    // 学生只能下载自己的提交
    if identity.role == UserRole::Student && submission.student_id != identity.user_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能下载自己的提交",
        )));
    }

    let bytes = match blob.get(&submission.file.blob_handle).await {
        Ok(bytes) => bytes,
        Err(e) => return Ok(error_response(&e)),
    };

    // 下载时使用原始文件名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", submission.file.file_name),
        ))
        .body(bytes))
}
