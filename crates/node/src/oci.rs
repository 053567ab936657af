//! Multi-registry image publishing with maximal partial success.

use async_trait::async_trait;
use conveyor_core::{Error, Result};
use conveyor_engine::gather;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

fn default_ttl_registry() -> String {
    "ttl.sh".to_string()
}

fn default_ttl() -> String {
    "60m".to_string()
}

/// Ephemeral-registry publishing: a random tag that the registry expires
/// after `ttl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlConfig {
    #[serde(default = "default_ttl_registry")]
    pub registry: String,
    #[serde(default = "default_ttl")]
    pub ttl: String,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            registry: default_ttl_registry(),
            ttl: default_ttl(),
        }
    }
}

/// Publish configuration. When `ttl` is set it replaces the registry list
/// with the single ephemeral registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub registries: Vec<String>,
    #[serde(default)]
    pub ttl: Option<TtlConfig>,
}

/// The image being published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTarget {
    pub name: String,
    pub version: String,
}

/// Pushes one fully qualified reference and returns the published ref.
#[async_trait]
pub trait RegistryPublisher: Send + Sync {
    async fn publish(&self, image_ref: &str) -> Result<String>;
}

/// Refs produced by successful pushes plus the last publish error, if any.
///
/// A failed registry never withholds refs contributed by the others;
/// callers must check both fields.
#[derive(Debug)]
pub struct PublishOutcome {
    pub image_refs: Vec<String>,
    pub error: Option<Error>,
}

/// Publish `image` to every configured registry concurrently.
///
/// Returns a configuration error before any dispatch when no registry is
/// configured. Individual publish failures are collected into
/// [`PublishOutcome::error`] while successful refs are still returned.
pub async fn publish_all(
    publisher: Arc<dyn RegistryPublisher>,
    config: &PublishConfig,
    image: &ImageTarget,
) -> Result<PublishOutcome> {
    let image_refs: Vec<String> = match &config.ttl {
        Some(ttl) => vec![format!("{}/{}:{}", ttl.registry, Uuid::new_v4(), ttl.ttl)],
        None => {
            if config.registries.is_empty() {
                return Err(Error::configuration(
                    "no registries configured for publish",
                ));
            }
            config
                .registries
                .iter()
                .map(|registry| format!("{}/{}:{}", registry, image.name, image.version))
                .collect()
        }
    };

    tracing::info!(
        image = %image.name,
        version = %image.version,
        refs = image_refs.len(),
        "publishing image"
    );

    let gathered = gather(image_refs, |image_ref| {
        let publisher = Arc::clone(&publisher);
        async move { publisher.publish(&image_ref).await }
    })
    .await;

    Ok(PublishOutcome {
        image_refs: gathered.values,
        error: gathered.last_error,
    })
}
