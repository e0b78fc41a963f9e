//! 评分编排模块
//!
//! - `grader`: 外部评分器接口与数据结构
//! - `register`: 评分器插件注册表
//! - `heuristic`: 内置启发式评分器
//! - `orchestrator`: 评分编排器，保证每个提交至多执行一次评分

pub mod grader;
pub mod heuristic;
pub mod orchestrator;
pub mod register;

pub use grader::{Grader, GraderRequest, GraderVerdict};
pub use orchestrator::GradingOrchestrator;

/// 注册评分器插件的宏
///
/// 在实现文件顶部声明，进程启动时自动注册到插件注册表。
#[macro_export]
macro_rules! declare_grader_plugin {
    ($name:literal, $ty:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_grader_ $ty:snake>]() {
                $crate::grading::register::register_grader_plugin(
                    $name,
                    std::sync::Arc::new(|| -> $crate::grading::register::BoxedGraderFuture {
                        Box::pin(async {
                            let grader = <$ty>::new()
                                .map_err($crate::errors::PortalError::grader_plugin_not_found)?;
                            Ok(Box::new(grader) as Box<dyn $crate::grading::Grader>)
                        })
                    }),
                );
            }
        }
    };
}
