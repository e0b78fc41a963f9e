use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::responses::AssignmentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 获取作业详情
/// GET /assignments/{id}
pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let clock = crate::services::get_clock(request);

    match service.load_assignment(request, assignment_id).await {
        Ok(Some(assignment)) => {
            let response = AssignmentResponse::from_assignment(&assignment, clock.now());
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
