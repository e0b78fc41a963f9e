use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 下载作业附件（按原始文件名定位，返回逐字节一致的内容）
/// GET /assignments/{id}/files/{file_name}
pub async fn download_file(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    file_name: String,
) -> ActixResult<HttpResponse> {
    let blob = crate::services::get_blob_store(request);

    let assignment = match service.load_assignment(request, assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    let Some(file) = assignment.find_file(&file_name) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            format!("作业附件不存在: {file_name}"),
        )));
    };

    let bytes = match blob.get(&file.blob_handle).await {
        Ok(bytes) => bytes,
        Err(e) => return Ok(error_response(&e)),
    };

    // 下载时使用原始文件名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ))
        .body(bytes))
}
