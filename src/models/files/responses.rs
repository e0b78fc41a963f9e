use serde::Serialize;

use crate::models::files::entities::FileRef;

/// 文件信息（对外响应，不含存储句柄）
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    /// 原始文件名
    pub file_name: String,
    /// 文件大小(字节)
    pub file_size: i64,
}

impl From<&FileRef> for FileInfo {
    fn from(file: &FileRef) -> Self {
        Self {
            file_name: file.file_name.clone(),
            file_size: file.file_size,
        }
    }
}
