use crate::errors::Result;
use crate::grading::grader::Grader;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedGraderFuture = Pin<Box<dyn Future<Output = Result<Box<dyn Grader>>> + Send>>;
pub type GraderConstructor = Arc<dyn Fn() -> BoxedGraderFuture + Send + Sync>;

static GRADER_REGISTRY: Lazy<RwLock<HashMap<String, GraderConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_grader_plugin<S: Into<String>>(name: S, constructor: GraderConstructor) {
    let name = name.into();
    let mut registry = GRADER_REGISTRY
        .write()
        .expect("Grader registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_grader_plugin(name: &str) -> Option<GraderConstructor> {
    GRADER_REGISTRY
        .read()
        .expect("Grader registry lock poisoned")
        .get(name)
        .cloned()
}

pub fn debug_grader_registry() {
    let registry = GRADER_REGISTRY
        .read()
        .expect("Grader registry lock poisoned");
    if registry.is_empty() {
        tracing::debug!("No grader plugins registered.");
    } else {
        tracing::debug!("Registered grader plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
