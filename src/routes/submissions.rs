use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireIdentity};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 学生提交作业
pub async fn submit(
    req: HttpRequest,
    path: web::Path<i64>, // assignment_id
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let student_id = match RequireIdentity::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .submit(&req, student_id, path.into_inner(), payload)
        .await
}

// 列出某作业的全部提交
pub async fn list_submissions(
    req: HttpRequest,
    path: web::Path<i64>, // assignment_id
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, path.into_inner())
        .await
}

// 获取我的提交
pub async fn get_my_submission(
    req: HttpRequest,
    path: web::Path<i64>, // assignment_id
) -> ActixResult<HttpResponse> {
    let student_id = match RequireIdentity::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .get_my_submission(&req, path.into_inner(), student_id)
        .await
}

// 获取提交详情
pub async fn get_submission(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (assignment_id, submission_id)
) -> ActixResult<HttpResponse> {
    let (assignment_id, submission_id) = path.into_inner();
    SUBMISSION_SERVICE
        .get_submission(&req, assignment_id, submission_id)
        .await
}

// 下载提交文件
pub async fn download_submission_file(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (assignment_id, submission_id)
) -> ActixResult<HttpResponse> {
    let (assignment_id, submission_id) = path.into_inner();
    SUBMISSION_SERVICE
        .download_file(&req, assignment_id, submission_id)
        .await
}

// 触发评分
pub async fn grade_submission(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (assignment_id, submission_id)
) -> ActixResult<HttpResponse> {
    let (assignment_id, submission_id) = path.into_inner();
    SUBMISSION_SERVICE
        .grade_submission(&req, assignment_id, submission_id)
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/submissions")
            .wrap(middlewares::RequireIdentity)
            .service(
                web::resource("")
                    // 列出提交 - 仅教师
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireRole::new(&UserRole::Faculty)),
                    )
                    // 提交作业 - 仅学生
                    .route(
                        web::post()
                            .to(submit)
                            .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                    ),
            )
            // 我的提交 - 仅学生
            .service(
                web::resource("/my")
                    .route(
                        web::get()
                            .to(get_my_submission)
                            .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                    ),
            )
            // 提交详情 - 所有权在业务层校验
            .service(web::resource("/{submission_id}").route(web::get().to(get_submission)))
            // 下载提交文件 - 所有权在业务层校验
            .service(
                web::resource("/{submission_id}/download")
                    .route(web::get().to(download_submission_file)),
            )
            // 触发评分 - 仅教师
            .service(
                web::resource("/{submission_id}/grade").route(
                    web::post()
                        .to(grade_submission)
                        .wrap(middlewares::RequireRole::new(&UserRole::Faculty)),
                ),
            ),
    );
}
