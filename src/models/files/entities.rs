use serde::{Deserialize, Serialize};

/// 已入库文件的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    // 原始文件名
    pub file_name: String,
    // 字节存储句柄
    pub blob_handle: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
}
