pub mod assignments;
pub mod common;
pub mod files;
pub mod submissions;
pub mod users;

pub use common::response::ApiResponse;

/// 应用启动时间，用于统计启动耗时
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随统一响应结构返回给调用方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 40000,
    ValidationFailed = 40001,
    Unauthorized = 40100,
    Forbidden = 40300,
    NotFound = 40400,
    AssignmentNotFound = 40401,
    SubmissionNotFound = 40402,
    FileNotFound = 40403,
    DuplicateSubmission = 40900,

    InternalServerError = 50000,
    GradingFailed = 50200,
}
