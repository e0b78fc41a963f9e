pub mod assignments;
pub mod submissions;

pub use assignments::AssignmentService;
pub use submissions::SubmissionService;

use std::sync::Arc;

use actix_multipart::Field;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::stream::StreamExt;

use crate::blob::BlobStore;
use crate::cache::ObjectCache;
use crate::errors::{PortalError, Result};
use crate::grading::GradingOrchestrator;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::clock::Clock;

// 辅助函数：从 app data 取共享组件
pub(crate) fn get_blob_store(request: &HttpRequest) -> Arc<dyn BlobStore> {
    request
        .app_data::<web::Data<Arc<dyn BlobStore>>>()
        .expect("Blob store not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn get_cache(request: &HttpRequest) -> Arc<dyn ObjectCache> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn get_clock(request: &HttpRequest) -> Arc<dyn Clock> {
    request
        .app_data::<web::Data<Arc<dyn Clock>>>()
        .expect("Clock not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn get_orchestrator(request: &HttpRequest) -> Arc<GradingOrchestrator> {
    request
        .app_data::<web::Data<Arc<GradingOrchestrator>>>()
        .expect("Grading orchestrator not found in app data")
        .get_ref()
        .clone()
}

/// 错误到 HTTP 响应的统一映射
pub(crate) fn error_response(err: &PortalError) -> HttpResponse {
    match err {
        PortalError::Validation(_) => HttpResponse::BadRequest().json(
            ApiResponse::<()>::error_empty(ErrorCode::ValidationFailed, err.message()),
        ),
        PortalError::NotFound(_) => HttpResponse::NotFound().json(
            ApiResponse::<()>::error_empty(ErrorCode::NotFound, err.message()),
        ),
        PortalError::Conflict(_) => HttpResponse::Conflict().json(
            ApiResponse::<()>::error_empty(ErrorCode::DuplicateSubmission, err.message()),
        ),
        PortalError::GradingFailed(_) => HttpResponse::BadGateway().json(
            ApiResponse::<()>::error_empty(ErrorCode::GradingFailed, err.message()),
        ),
        _ => HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
            ErrorCode::InternalServerError,
            err.format_simple(),
        )),
    }
}

/// 读取 multipart 字段的全部字节，超过 max_size 直接拒绝
pub(crate) async fn read_field_bytes(field: &mut Field, max_size: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes =
            chunk.map_err(|e| PortalError::file_operation(format!("读取上传分片失败: {e}")))?;
        if data.len() + bytes.len() > max_size {
            return Err(PortalError::validation("File size exceeds the limit"));
        }
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

/// 读取 multipart 文本字段
pub(crate) async fn read_field_text(field: &mut Field) -> Result<String> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes =
            chunk.map_err(|e| PortalError::file_operation(format!("读取上传分片失败: {e}")))?;
        data.extend_from_slice(&bytes);
    }
    String::from_utf8(data).map_err(|_| PortalError::validation("Field must be valid UTF-8"))
}
