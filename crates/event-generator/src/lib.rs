//! Synthetic analytics event generator for traffic-launcher.
//!
//! Events are produced by an [`EventSchema`] from a [`SeededRandom`] owned by
//! one worker. The random source is a plain xorshift32, so a given seed always
//! yields the same sequence of records (apart from wall-clock timestamps).
//!
//! # Architecture
//!
//! ```text
//!  base_seed + worker_id
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────┐
//! │  SeededRandom   │────▶│  ClientPool  │  (built once per worker)
//! └────────┬────────┘     └──────┬───────┘
//!          │                     │
//!          ▼                     ▼
//! ┌──────────────────────────────────────┐
//! │   EventSchema (shopping-mall, auto)  │
//! └──────────────────┬───────────────────┘
//!                    ▼
//!               EventRecord ──▶ JSON body
//! ```
//!
//! # Example
//!
//! ```rust
//! use event_generator::{EventSchema, SchemaKind, SchemaOptions, SeededRandom};
//!
//! let mut rng = SeededRandom::for_worker(42, 1);
//! let schema = SchemaKind::ShoppingMall
//!     .build(&mut rng, &SchemaOptions::default())
//!     .unwrap();
//! let event = schema.synthesize(&mut rng);
//! assert_eq!(event.client_id.len(), 36);
//! ```

pub mod client_pool;
pub mod error;
pub mod event;
pub mod generators;
pub mod rng;
pub mod schema;
pub mod schemas;

pub use client_pool::{ClientPool, DEFAULT_CLIENT_POOL_SIZE};
pub use error::GeneratorError;
pub use event::{DeviceType, EventDetails, EventName, EventRecord};
pub use rng::SeededRandom;
pub use schema::{EventSchema, SchemaKind, SchemaOptions};
