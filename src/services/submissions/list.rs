use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::responses::{SubmissionListResponse, SubmissionResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 列出某作业的全部提交（提交时间升序，插入顺序决胜）
/// GET /assignments/{id}/submissions
pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 作业必须存在
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.list_submissions(assignment_id).await {
        Ok(submissions) => {
            let items: Vec<SubmissionResponse> =
                submissions.iter().map(SubmissionResponse::from).collect();
            let total = items.len() as i64;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionListResponse { items, total },
                "查询成功",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
