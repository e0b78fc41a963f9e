//! 文件字节存储层
//!
//! 上传的文件字节通过 put/get 句柄接口访问，元数据保存在数据库中。
//! 当前提供本地文件系统实现；对象存储等后端可按相同接口接入。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;

mod local;

pub use local::LocalBlobStore;

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    // 写入字节，返回新句柄；返回成功即字节已持久化
    async fn put(&self, bytes: &[u8]) -> Result<String>;
    // 按句柄读取全部字节
    async fn get(&self, handle: &str) -> Result<Vec<u8>>;
    // 删除句柄对应的字节（用于回滚未完成的创建）
    async fn remove(&self, handle: &str) -> Result<()>;
}

pub fn create_blob_store() -> Result<Arc<dyn BlobStore>> {
    let config = AppConfig::get();
    let store = LocalBlobStore::new(&config.blob.dir)?;
    Ok(Arc::new(store))
}
