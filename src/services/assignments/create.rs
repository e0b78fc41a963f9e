use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;

use super::AssignmentService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assignments::{
    entities::Assignment, requests::CreateAssignmentRequest, responses::AssignmentResponse,
};
use crate::models::files::entities::FileRef;
use crate::services::{error_response, read_field_bytes, read_field_text};
use crate::utils::validate::{parse_deadline, sanitize_filename, validate_title};

/// 创建作业
/// POST /assignments
///
/// multipart 表单：title、description（可选）、deadline、files（可重复）。
/// 附件字节先写入字节存储；任何一步失败则整体拒绝并回收已写入的字节，
/// 不会出现半成品作业。
pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    user_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.blob.max_file_size;

    let storage = service.get_storage(request);
    let blob = crate::services::get_blob_store(request);
    let clock = crate::services::get_clock(request);
    let cache = crate::services::get_cache(request);

    let mut title_raw: Option<String> = None;
    let mut description: Option<String> = None;
    let mut deadline_raw: Option<String> = None;
    let mut stored_files: Vec<FileRef> = Vec::new();

    // 逐字段消费 multipart 表单
    let parse_outcome: Result<()> = async {
        while let Ok(Some(mut field)) = payload.try_next().await {
            let name = field
                .content_disposition()
                .and_then(|cd| cd.get_name())
                .unwrap_or_default()
                .to_string();

            match name.as_str() {
                "title" => title_raw = Some(read_field_text(&mut field).await?),
                "description" => {
                    let text = read_field_text(&mut field).await?;
                    if !text.trim().is_empty() {
                        description = Some(text);
                    }
                }
                "deadline" => deadline_raw = Some(read_field_text(&mut field).await?),
                "files" => {
                    let original = field
                        .content_disposition()
                        .and_then(|cd| cd.get_filename())
                        .map(|s| s.to_string())
                        .unwrap_or_default();

                    let file_name = sanitize_filename(&original)?;
                    let bytes = read_field_bytes(&mut field, max_size).await?;
                    let blob_handle = blob.put(&bytes).await?;

                    stored_files.push(FileRef {
                        file_name,
                        blob_handle,
                        file_size: bytes.len() as i64,
                    });
                }
                // 未知字段忽略
                _ => {}
            }
        }
        Ok(())
    }
    .await;

    let created: Result<Assignment> = match parse_outcome {
        Err(e) => Err(e),
        Ok(()) => {
            let build = || -> Result<CreateAssignmentRequest> {
                let title = validate_title(title_raw.as_deref().unwrap_or_default())?;
                let deadline = parse_deadline(deadline_raw.as_deref().unwrap_or_default())?;
                Ok(CreateAssignmentRequest {
                    title,
                    description: description.clone(),
                    deadline,
                    files: stored_files.clone(),
                })
            };
            match build() {
                Ok(req) => storage.create_assignment(user_id, req, clock.now()).await,
                Err(e) => Err(e),
            }
        }
    };

    match created {
        Ok(assignment) => {
            let key = format!("assignment:{}", assignment.id);
            crate::cache::put_object(&cache, key, &assignment, 0).await;

            let response = AssignmentResponse::from_assignment(&assignment, clock.now());
            Ok(HttpResponse::Created().json(ApiResponse::success(response, "作业创建成功")))
        }
        Err(e) => {
            // 作业未落库，回收已写入的文件字节
            for file in &stored_files {
                let _ = blob.remove(&file.blob_handle).await;
            }
            Ok(error_response(&e))
        }
    }
}
