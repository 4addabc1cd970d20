//! Storefront schema: page views, clicks, carts, purchases and wishlists.

use super::tables::{
    self, BROWSERS, BUTTON_LABELS, CITIES, GENDERS, OS_LIST, PAGE_PATHS, PAYMENT_METHODS,
    PRODUCT_CATEGORIES, PRODUCT_NAMES, SHIPPING_ADDRESSES, TRAFFIC_SOURCES, UTM_CAMPAIGNS,
    UTM_CONTENT,
};
use crate::client_pool::ClientPool;
use crate::event::{
    ClickPosition, DeviceContext, DeviceType, EventContext, EventDetails, EventName, EventRecord,
    GeoContext, Properties, TrafficSourceContext, UtmParams,
};
use crate::generators::{format_local_timestamp, session_id};
use crate::rng::SeededRandom;
use crate::schema::EventSchema;
use chrono::{DateTime, Local};

/// Event names drawn by this schema.
pub const SHOPPING_EVENTS: &[EventName] = &[
    EventName::PageView,
    EventName::ButtonClick,
    EventName::AddToCart,
    EventName::Purchase,
    EventName::WishlistAdd,
];

/// A purchase used a coupon when its draw lands above this.
const COUPON_THRESHOLD: f64 = 0.7;

pub struct ShoppingMallSchema {
    clients: ClientPool,
    reuse_probability: f64,
}

impl ShoppingMallSchema {
    pub fn new(clients: ClientPool, reuse_probability: f64) -> Self {
        Self {
            clients,
            reuse_probability,
        }
    }

    #[cfg(test)]
    fn clients(&self) -> &ClientPool {
        &self.clients
    }

    fn details(
        &self,
        event_name: EventName,
        rng: &mut SeededRandom,
        os: &str,
        now: &DateTime<Local>,
    ) -> EventDetails {
        match event_name {
            EventName::PageView => EventDetails::PageView {
                page_load_time: rng.random_int(500, 3000),
                user_agent: tables::user_agent(os).to_string(),
            },
            EventName::ButtonClick => EventDetails::ButtonClick {
                button_text: rng.random_choice(BUTTON_LABELS).to_string(),
                button_id: format!("btn_{}", rng.random_int(1, 100)),
                click_position: ClickPosition {
                    x: rng.random_int(0, 1200),
                    y: rng.random_int(0, 800),
                },
            },
            EventName::AddToCart => {
                // name is drawn before the id
                let product_name = rng.random_choice(PRODUCT_NAMES).to_string();
                EventDetails::AddToCart {
                    product_id: rng.random_int(1, 1000),
                    product_name,
                    product_category: rng.random_choice(PRODUCT_CATEGORIES).to_string(),
                    product_price: rng.random_int(10_000, 500_000),
                    quantity: rng.random_int(1, 5),
                    cart_total: rng.random_int(50_000, 1_000_000),
                }
            }
            EventName::Purchase => EventDetails::Purchase {
                order_id: format!(
                    "ORD_{}_{}",
                    now.timestamp_millis(),
                    rng.random_int(1000, 9999)
                ),
                total_amount: rng.random_int(50_000, 500_000),
                payment_method: rng.random_choice(PAYMENT_METHODS).to_string(),
                shipping_address: rng.random_choice(SHIPPING_ADDRESSES).to_string(),
                coupon_used: rng.next_f64() > COUPON_THRESHOLD,
                discount_amount: rng.random_int(0, 50_000),
            },
            EventName::WishlistAdd => EventDetails::WishlistAdd {
                product_id: rng.random_int(1, 1000),
                product_name: rng.random_choice(PRODUCT_NAMES).to_string(),
                product_price: rng.random_int(10_000, 500_000),
                wishlist_count: rng.random_int(1, 20),
            },
            // Not drawn by this schema; kept total over every name.
            EventName::AutoClick => EventDetails::AutoClick {
                is_button: false,
                target_text: String::new(),
            },
        }
    }
}

impl EventSchema for ShoppingMallSchema {
    fn name(&self) -> &'static str {
        "shopping-mall"
    }

    fn synthesize_at(&self, rng: &mut SeededRandom, now: DateTime<Local>) -> EventRecord {
        let os = *rng.random_choice(OS_LIST);
        let gender = *rng.random_choice(GENDERS);
        let event_name = *rng.random_choice(SHOPPING_EVENTS);

        let client_id = self.clients.pick(rng, self.reuse_probability);

        let page_path = *rng.random_choice(PAGE_PATHS);
        let source = *rng.random_choice(TRAFFIC_SOURCES);
        let campaign = *rng.random_choice(UTM_CAMPAIGNS);
        let medium = tables::traffic_medium(source);
        let device_type = DeviceType::for_os(os);

        let properties = Properties {
            page_path: page_path.to_string(),
            page_title: tables::page_title(page_path).to_string(),
            referrer: tables::referrer(source).to_string(),
            details: self.details(event_name, rng, os, &now),
        };

        let user_id = rng.random_int(1, 10_000);

        let context = EventContext {
            geo: GeoContext {
                country: tables::COUNTRY.to_string(),
                city: rng.random_choice(CITIES).to_string(),
                timezone: tables::TIMEZONE.to_string(),
            },
            device: DeviceContext {
                device_type,
                os: os.to_string(),
                browser: rng.random_choice(BROWSERS).to_string(),
                language: tables::LANGUAGE.to_string(),
                timezone: tables::TIMEZONE.to_string(),
            },
            traffic_source: TrafficSourceContext {
                medium: medium.to_string(),
                source: source.to_string(),
                campaign: Some(campaign.to_string()),
            },
            user_agent: tables::user_agent(os).to_string(),
            screen_resolution: rng.random_choice(tables::screen_resolutions(os)).to_string(),
            viewport_size: rng.random_choice(tables::viewport_sizes(os)).to_string(),
            utm_params: UtmParams {
                utm_source: Some(source.to_string()),
                utm_medium: Some(medium.to_string()),
                utm_campaign: Some(campaign.to_string()),
                utm_content: Some(rng.random_choice(UTM_CONTENT).to_string()),
            },
        };

        EventRecord {
            event_name,
            timestamp: format_local_timestamp(&now),
            session_id: session_id(&now, &client_id),
            client_id,
            user_id,
            device_type,
            traffic_medium: medium.to_string(),
            traffic_source: source.to_string(),
            properties,
            context,
            user_gender: gender.to_string(),
            user_age: rng.random_int(18, 65),
        }
    }
}
