use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireIdentity;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 获取提交详情
/// GET /assignments/{id}/submissions/{submission_id}
pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
    };

    match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => {
            if submission.assignment_id != assignment_id {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SubmissionNotFound,
                    "提交不存在",
                )));
            }

            // 学生只能查看自己的提交
            if identity.role == UserRole::Student && submission.student_id != identity.user_id {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "只能查看自己的提交",
                )));
            }

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse::from(&submission),
                "查询成功",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 获取当前学生的提交
/// GET /assignments/{id}/submissions/my
///
/// 尚未提交时返回 404，调用方应将其视为“还没交”，不是异常。
pub async fn get_my_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .get_submission_by_student(assignment_id, student_id)
        .await
    {
        Ok(Some(submission)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionResponse::from(&submission),
            "查询成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "该作业尚未提交",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
