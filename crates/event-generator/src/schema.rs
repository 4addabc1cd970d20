//! Pluggable event schemas.

use crate::client_pool::{ClientPool, DEFAULT_CLIENT_POOL_SIZE};
use crate::error::GeneratorError;
use crate::event::EventRecord;
use crate::rng::SeededRandom;
use crate::schemas::{AutoClickSchema, ShoppingMallSchema};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy producing one event per call.
///
/// Implementations must derive every field from `rng` and static tables so a
/// fixed seed reproduces the same sequence of records (timestamps aside).
pub trait EventSchema: Send + Sync {
    /// Schema identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Build one event stamped with `now`.
    fn synthesize_at(&self, rng: &mut SeededRandom, now: DateTime<Local>) -> EventRecord;

    /// Build one event stamped with the current local time.
    fn synthesize(&self, rng: &mut SeededRandom) -> EventRecord {
        self.synthesize_at(rng, Local::now())
    }
}

/// Available schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    /// Storefront events with returning visitors.
    #[default]
    ShoppingMall,
    /// Single generic click event with a fixed simulator context.
    AutoClick,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::ShoppingMall => "shopping-mall",
            SchemaKind::AutoClick => "auto-click",
        }
    }

    /// Reuse probability applied when none is configured.
    pub fn default_reuse_probability(&self) -> f64 {
        match self {
            SchemaKind::ShoppingMall => 0.7,
            SchemaKind::AutoClick => 0.0,
        }
    }

    /// Build the schema for one worker, drawing its client pool from `rng`.
    pub fn build(
        self,
        rng: &mut SeededRandom,
        options: &SchemaOptions,
    ) -> Result<Box<dyn EventSchema>, GeneratorError> {
        let reuse = options
            .client_reuse_probability
            .unwrap_or_else(|| self.default_reuse_probability());
        if !(0.0..=1.0).contains(&reuse) {
            return Err(GeneratorError::InvalidReuseProbability(reuse));
        }

        // No pool is needed when ids are never reused.
        let pool = if reuse > 0.0 {
            ClientPool::generate(rng, options.client_pool_size)
        } else {
            ClientPool::empty()
        };

        Ok(match self {
            SchemaKind::ShoppingMall => Box::new(ShoppingMallSchema::new(pool, reuse)),
            SchemaKind::AutoClick => Box::new(AutoClickSchema::new(pool, reuse)),
        })
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "shopping-mall" | "shopping" => Ok(SchemaKind::ShoppingMall),
            "auto-click" | "auto" => Ok(SchemaKind::AutoClick),
            _ => Err(GeneratorError::UnknownSchema(s.to_string())),
        }
    }
}

/// Client pool settings applied when building a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaOptions {
    pub client_pool_size: usize,
    /// `None` uses [`SchemaKind::default_reuse_probability`].
    pub client_reuse_probability: Option<f64>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            client_pool_size: DEFAULT_CLIENT_POOL_SIZE,
            client_reuse_probability: None,
        }
    }
}
