//! Synthetic analytics event payload.
//!
//! An [`EventRecord`] is created per dispatch, serialized to JSON, sent once
//! and dropped. The `properties` object carries a shared base plus fields
//! specific to the event name (see [`EventDetails`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event names across all schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    PageView,
    ButtonClick,
    AddToCart,
    Purchase,
    WishlistAdd,
    AutoClick,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::PageView => "page_view",
            EventName::ButtonClick => "button_click",
            EventName::AddToCart => "add_to_cart",
            EventName::Purchase => "purchase",
            EventName::WishlistAdd => "wishlist_add",
            EventName::AutoClick => "auto_click",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device class derived from the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Desktop,
}

impl DeviceType {
    /// `Mobile` for Android and iOS, `Desktop` for anything else.
    pub fn for_os(os: &str) -> Self {
        match os {
            "Android" | "iOS" => DeviceType::Mobile,
            _ => DeviceType::Desktop,
        }
    }
}

/// One synthesized analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_name: EventName,
    pub timestamp: String,
    pub client_id: String,
    pub user_id: i64,
    pub session_id: String,
    pub device_type: DeviceType,
    pub traffic_medium: String,
    pub traffic_source: String,
    pub properties: Properties,
    pub context: EventContext,
    pub user_gender: String,
    pub user_age: i64,
}

impl EventRecord {
    /// Operating system recorded in the device context.
    pub fn os(&self) -> &str {
        &self.context.device.os
    }

    /// Serialize to the JSON wire body.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Properties shared by every event plus the event-specific part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub page_path: String,
    pub page_title: String,
    pub referrer: String,
    #[serde(flatten)]
    pub details: EventDetails,
}

/// Event-specific property fields, flattened into `properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDetails {
    PageView {
        page_load_time: i64,
        user_agent: String,
    },
    ButtonClick {
        button_text: String,
        button_id: String,
        click_position: ClickPosition,
    },
    AddToCart {
        product_id: i64,
        product_name: String,
        product_category: String,
        product_price: i64,
        quantity: i64,
        cart_total: i64,
    },
    Purchase {
        order_id: String,
        total_amount: i64,
        payment_method: String,
        shipping_address: String,
        coupon_used: bool,
        discount_amount: i64,
    },
    WishlistAdd {
        product_id: i64,
        product_name: String,
        product_price: i64,
        wishlist_count: i64,
    },
    AutoClick {
        is_button: bool,
        target_text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickPosition {
    pub x: i64,
    pub y: i64,
}

/// Nested context object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub geo: GeoContext,
    pub device: DeviceContext,
    pub traffic_source: TrafficSourceContext,
    pub user_agent: String,
    pub screen_resolution: String,
    pub viewport_size: String,
    pub utm_params: UtmParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoContext {
    pub country: String,
    pub city: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceContext {
    pub device_type: DeviceType,
    pub os: String,
    pub browser: String,
    pub language: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSourceContext {
    pub medium: String,
    pub source: String,
    pub campaign: Option<String>,
}

/// UTM parameters; serializes to `{}` when none are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
}
