//! 本地文件系统字节存储

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::blob::BlobStore;
use crate::errors::{PortalError, Result};

pub struct LocalBlobStore {
    dir: PathBuf,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(|e| PortalError::file_operation(format!("创建存储目录失败: {e}")))?;
        }
        Ok(Self { dir })
    }

    fn path_for(&self, handle: &str) -> Result<PathBuf> {
        // 句柄由本层生成，仍拒绝任何可疑字符，防止路径逃逸
        if handle.is_empty()
            || !handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(PortalError::file_operation(format!(
                "非法的存储句柄: {handle}"
            )));
        }
        Ok(self.dir.join(format!("{handle}.bin")))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<String> {
        let handle = format!("{}-{}", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let path = self.path_for(&handle)?;

        let mut file = File::create(&path)
            .map_err(|e| PortalError::file_operation(format!("创建文件失败: {e}")))?;
        file.write_all(bytes)
            .map_err(|e| PortalError::file_operation(format!("写入文件失败: {e}")))?;
        file.sync_all()
            .map_err(|e| PortalError::file_operation(format!("刷盘失败: {e}")))?;

        Ok(handle)
    }

    async fn get(&self, handle: &str) -> Result<Vec<u8>> {
        let path = self.path_for(handle)?;

        if !Path::new(&path).exists() {
            return Err(PortalError::not_found(format!("文件不存在: {handle}")));
        }

        let mut file = File::open(&path)
            .map_err(|e| PortalError::file_operation(format!("打开文件失败: {e}")))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| PortalError::file_operation(format!("读取文件失败: {e}")))?;

        Ok(buf)
    }

    async fn remove(&self, handle: &str) -> Result<()> {
        let path = self.path_for(handle)?;
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| PortalError::file_operation(format!("删除文件失败: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalBlobStore {
        let dir = std::env::temp_dir().join(format!("blob-test-{}", Uuid::new_v4()));
        LocalBlobStore::new(dir).unwrap()
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = temp_store();
        let bytes = b"print('hello')\n".to_vec();

        let handle = store.put(&bytes).await.unwrap();
        let read_back = store.get(&handle).await.unwrap();

        assert_eq!(read_back, bytes);
    }

    #[tokio::test]
    async fn test_get_unknown_handle() {
        let store = temp_store();
        let err = store.get("1700000000-deadbeef").await.unwrap_err();
        assert_eq!(err.code(), "E002");
    }

    #[tokio::test]
    async fn test_rejects_path_escape() {
        let store = temp_store();
        assert!(store.get("../etc/passwd").await.is_err());
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_then_get_fails() {
        let store = temp_store();
        let handle = store.put(b"data").await.unwrap();
        store.remove(&handle).await.unwrap();
        assert!(store.get(&handle).await.is_err());
    }
}
