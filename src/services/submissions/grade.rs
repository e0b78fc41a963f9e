use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireIdentity;
use crate::models::submissions::responses::GradeInfo;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 触发评分
/// POST /assignments/{id}/submissions/{submission_id}/grade
///
/// 幂等操作：对已评分的提交重复调用返回既有评分，不会再次触发评分器。
pub async fn grade_submission(
    _service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let orchestrator = crate::services::get_orchestrator(request);

    let Some(identity) = RequireIdentity::extract_identity(request) else {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
    };

    match orchestrator
        .grade(assignment_id, submission_id, identity.user_id)
        .await
    {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeInfo::from(&grade),
            "评分成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
