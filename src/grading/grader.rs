//! 外部评分器接口
//!
//! 评分器的内部逻辑不在本服务范围内（可能是 LLM、判题机或人工队列的代理），
//! 编排器只依赖这个接口。

use async_trait::async_trait;

use crate::errors::Result;

/// 一次评分调用的输入：作业上下文与提交内容
#[derive(Debug, Clone)]
pub struct GraderRequest {
    pub assignment_title: String,
    pub assignment_description: Option<String>,
    pub file_name: String,
    pub content: Vec<u8>,
}

/// 评分器返回的结论，分数期望落在 [0, 100]
#[derive(Debug, Clone, PartialEq)]
pub struct GraderVerdict {
    pub score: f64,
    pub feedback: String,
}

#[async_trait]
pub trait Grader: Send + Sync {
    async fn score(&self, request: GraderRequest) -> Result<GraderVerdict>;
}
