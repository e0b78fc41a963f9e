use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireIdentity};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::AssignmentService;
use crate::utils::SafeIdI64;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// 列出作业
pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req).await
}

// 创建作业
pub async fn create_assignment(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    let user_id = match RequireIdentity::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    ASSIGNMENT_SERVICE
        .create_assignment(&req, user_id, payload)
        .await
}

// 获取作业详情
pub async fn get_assignment(req: HttpRequest, path: SafeIdI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, path.0).await
}

// 下载作业附件
pub async fn download_assignment_file(
    req: HttpRequest,
    path: web::Path<(i64, String)>,
) -> ActixResult<HttpResponse> {
    let (assignment_id, file_name) = path.into_inner();
    ASSIGNMENT_SERVICE
        .download_file(&req, assignment_id, file_name)
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireIdentity)
            .service(
                web::resource("")
                    // 列出作业 - 所有已认证用户可访问
                    .route(web::get().to(list_assignments))
                    // 创建作业 - 仅教师
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new(&UserRole::Faculty)),
                    ),
            )
            // 获取作业详情 - 所有已认证用户可访问
            .service(web::resource("/{id}").route(web::get().to(get_assignment)))
            // 下载作业附件 - 所有已认证用户可访问
            .service(
                web::resource("/{id}/files/{file_name:.*}")
                    .route(web::get().to(download_assignment_file)),
            ),
    );
}
