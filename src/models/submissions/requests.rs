use crate::models::files::entities::FileRef;

/// 创建提交请求
///
/// 文件字节在业务层已写入字节存储，这里只携带元数据。
#[derive(Debug, Clone)]
pub struct CreateSubmissionRequest {
    pub assignment_id: i64,
    pub file: FileRef,
}
