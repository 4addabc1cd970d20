//! Value generators shared by the event schemas.

pub mod timestamp;
pub mod uuid;

pub use self::timestamp::{format_local_timestamp, session_id, EVENT_TIMESTAMP_FORMAT};
pub use self::uuid::generate_uuid_v4;
#[cfg(test)]
pub(crate) use self::uuid::is_uuid_v4;
