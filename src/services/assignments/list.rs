use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::responses::{AssignmentListResponse, AssignmentResponse};
use crate::services::error_response;

/// 列出作业（按创建时间倒序，状态按当前时刻推导）
/// GET /assignments
pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let clock = crate::services::get_clock(request);

    match storage.list_assignments().await {
        Ok(assignments) => {
            let now = clock.now();
            let items: Vec<AssignmentResponse> = assignments
                .iter()
                .map(|a| AssignmentResponse::from_assignment(a, now))
                .collect();
            let total = items.len() as i64;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AssignmentListResponse { items, total },
                "查询成功",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
