//! 缓存层
//!
//! 对象缓存用于读多写少的作业记录（创建后不可变，因此无需失效）。
//! 后端通过插件注册表选择，支持 Moka（内存）与 Redis。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// 以 JSON 形式读取缓存对象，解码失败时清除脏数据
pub async fn get_object<T: DeserializeOwned>(
    cache: &Arc<dyn ObjectCache>,
    key: &str,
) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(_) => {
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

/// 以 JSON 形式写入缓存对象，序列化失败时静默跳过
pub async fn put_object<T: Serialize>(cache: &Arc<dyn ObjectCache>, key: String, value: &T, ttl: u64) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json, ttl).await;
    }
}

/// 注册对象缓存插件的宏
///
/// 在实现文件顶部声明，进程启动时自动注册到插件注册表。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_ $ty:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                        Box::pin(async {
                            let cache = <$ty>::new()
                                .map_err($crate::errors::PortalError::cache_connection)?;
                            Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                        })
                    }),
                );
            }
        }
    };
}
