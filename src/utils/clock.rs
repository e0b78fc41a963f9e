//! 时钟抽象
//!
//! 迟交判定与作业状态推导都依赖调用时刻的墙钟时间；
//! 通过注入时钟，测试可以固定“现在”而不必与真实时间赛跑。

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 生产环境时钟，直接读系统时间
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
