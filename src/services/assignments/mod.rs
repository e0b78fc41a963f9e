pub mod create;
pub mod detail;
pub mod download;
pub mod list;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache;
use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 读取作业，优先走缓存（作业创建后不可变，缓存无需失效）
    pub(crate) async fn load_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let cache = super::get_cache(request);
        let key = format!("assignment:{assignment_id}");

        if let Some(assignment) = cache::get_object::<Assignment>(&cache, &key).await {
            return Ok(Some(assignment));
        }

        let storage = self.get_storage(request);
        match storage.get_assignment_by_id(assignment_id).await? {
            Some(assignment) => {
                cache::put_object(&cache, key, &assignment, 0).await;
                Ok(Some(assignment))
            }
            None => Ok(None),
        }
    }

    /// 创建作业
    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        user_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, user_id, payload).await
    }

    /// 列出作业
    pub async fn list_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request).await
    }

    /// 获取作业详情
    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    /// 下载作业附件
    pub async fn download_file(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        file_name: String,
    ) -> ActixResult<HttpResponse> {
        download::download_file(self, request, assignment_id, file_name).await
    }
}
