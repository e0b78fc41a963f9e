use crate::blob::BlobStore;
use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::grading::{Grader, GradingOrchestrator, register::get_grader_plugin};
use crate::storage::Storage;
use crate::utils::clock::{Clock, SystemClock};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub blob: Arc<dyn BlobStore>,
    pub clock: Arc<dyn Clock>,
    pub orchestrator: Arc<GradingOrchestrator>,
}

/// 创建缓存实例
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    // 根据配置选择缓存后端
    if let Some(constructor) = get_object_cache_plugin(cache_type) {
        match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create {} cache: {}", cache_type, e);
            }
        }
    } else {
        warn!("Cache backend '{}' not found in registry", cache_type);
    }

    // 配置的缓存不可用时回退到内存缓存
    if cache_type != "moka"
        && let Some(fallback_constructor) = get_object_cache_plugin("moka")
    {
        warn!("Falling back to Moka (in-memory) cache backend");
        match fallback_constructor().await {
            Ok(cache) => {
                warn!("Successfully created fallback Moka cache backend");
                return Ok(Arc::from(cache));
            }
            Err(fallback_e) => {
                warn!("Failed to create fallback Moka cache: {}", fallback_e);
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 创建评分器实例
async fn create_grader() -> Result<Arc<dyn Grader>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let provider = &config.grading.provider;

    warn!("Attempting to create '{}' grader backend", provider);

    if let Some(constructor) = get_grader_plugin(provider) {
        match constructor().await {
            Ok(grader) => {
                warn!("Successfully created '{}' grader backend", provider);
                return Ok(Arc::from(grader));
            }
            Err(e) => {
                warn!("Failed to create '{}' grader: {}", provider, e);
            }
        }
    } else {
        warn!("Grader backend '{}' not found in registry", provider);
    }

    // 配置的评分器不可用时回退到内置启发式评分器
    if provider != "heuristic"
        && let Some(fallback_constructor) = get_grader_plugin("heuristic")
    {
        warn!("Falling back to heuristic grader backend");
        if let Ok(grader) = fallback_constructor().await {
            return Ok(Arc::from(grader));
        }
    }

    Err(format!("No grader backend available (tried: {provider})").into())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、字节存储与评分编排器
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        crate::grading::register::debug_grader_registry();
        debug!("Debug mode: plugin registries dumped");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let blob = crate::blob::create_blob_store().expect("Failed to create blob store");
    warn!("Blob store initialized");

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let grader = create_grader().await.expect("Failed to create grader");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let orchestrator = Arc::new(GradingOrchestrator::new(
        storage.clone(),
        blob.clone(),
        grader,
        clock.clone(),
        &AppConfig::get().grading,
    ));
    warn!("Grading orchestrator initialized");

    StartupContext {
        storage,
        cache,
        blob,
        clock,
        orchestrator,
    }
}
