//! Minimal schema: one generic click event with a fixed simulator context.

use super::tables::{GENDERS, OS_LIST};
use crate::client_pool::ClientPool;
use crate::event::{
    DeviceContext, DeviceType, EventContext, EventDetails, EventName, EventRecord, GeoContext,
    Properties, TrafficSourceContext, UtmParams,
};
use crate::generators::{format_local_timestamp, session_id};
use crate::rng::SeededRandom;
use crate::schema::EventSchema;
use chrono::{DateTime, Local};

pub const AUTO_CLICK_EVENTS: &[EventName] = &[EventName::AutoClick];

pub struct AutoClickSchema {
    clients: ClientPool,
    reuse_probability: f64,
}

impl AutoClickSchema {
    pub fn new(clients: ClientPool, reuse_probability: f64) -> Self {
        Self {
            clients,
            reuse_probability,
        }
    }
}

impl EventSchema for AutoClickSchema {
    fn name(&self) -> &'static str {
        "auto-click"
    }

    fn synthesize_at(&self, rng: &mut SeededRandom, now: DateTime<Local>) -> EventRecord {
        let os = *rng.random_choice(OS_LIST);
        let gender = *rng.random_choice(GENDERS);
        let client_id = self.clients.pick(rng, self.reuse_probability);
        let event_name = *rng.random_choice(AUTO_CLICK_EVENTS);
        let device_type = DeviceType::for_os(os);

        let user_id = rng.random_int(0, 99_999);
        let target_text = format!("button {}", rng.random_int(0, 7));

        EventRecord {
            event_name,
            timestamp: format_local_timestamp(&now),
            session_id: session_id(&now, &client_id),
            client_id,
            user_id,
            device_type,
            traffic_medium: "direct".to_string(),
            traffic_source: "cli_simulator".to_string(),
            properties: Properties {
                page_path: "/cli".to_string(),
                page_title: "CLI Simulate".to_string(),
                referrer: String::new(),
                details: EventDetails::AutoClick {
                    is_button: true,
                    target_text,
                },
            },
            context: EventContext {
                geo: GeoContext {
                    country: "KR".to_string(),
                    city: "Seoul".to_string(),
                    timezone: "Asia/Seoul".to_string(),
                },
                device: DeviceContext {
                    device_type,
                    os: os.to_string(),
                    browser: "Chrome".to_string(),
                    language: "ko-KR".to_string(),
                    timezone: "Asia/Seoul".to_string(),
                },
                traffic_source: TrafficSourceContext {
                    medium: "cli".to_string(),
                    source: "simulated".to_string(),
                    campaign: None,
                },
                user_agent: "Simulator/CLI".to_string(),
                screen_resolution: "1920x1080".to_string(),
                viewport_size: "1200x800".to_string(),
                utm_params: UtmParams::default(),
            },
            user_gender: gender.to_string(),
            user_age: rng.random_int(10, 49),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{generate_uuid_v4, is_uuid_v4};

    #[test]
    fn test_auto_click_shape() {
        let mut rng = SeededRandom::new(4);
        let schema = AutoClickSchema::new(ClientPool::empty(), 0.0);

        for _ in 0..1000 {
            let event = schema.synthesize(&mut rng);

            assert_eq!(event.event_name, EventName::AutoClick);
            assert!(is_uuid_v4(&event.client_id));
            assert!((0..=99_999).contains(&event.user_id));
            assert!((10..=49).contains(&event.user_age));
            assert_eq!(event.device_type, event.context.device.device_type);
            assert_eq!(event.device_type, DeviceType::for_os(event.os()));

            match &event.properties.details {
                EventDetails::AutoClick {
                    is_button,
                    target_text,
                } => {
                    assert!(is_button);
                    let n: i64 = target_text.strip_prefix("button ").unwrap().parse().unwrap();
                    assert!((0..=7).contains(&n));
                }
                other => panic!("unexpected details {other:?}"),
            }
        }
    }

    #[test]
    fn test_auto_click_draw_order() {
        let schema = AutoClickSchema::new(ClientPool::empty(), 0.0);
        let mut rng = SeededRandom::new(2024);
        let mut expected = rng.clone();
        let event = schema.synthesize(&mut rng);

        // os, gender, uuid, event name, user id, target, age
        assert_eq!(event.os(), *expected.random_choice(OS_LIST));
        assert_eq!(event.user_gender, *expected.random_choice(GENDERS));
        assert_eq!(event.client_id, generate_uuid_v4(&mut expected));
        assert_eq!(event.event_name, *expected.random_choice(AUTO_CLICK_EVENTS));
        assert_eq!(event.user_id, expected.random_int(0, 99_999));
        let target = format!("button {}", expected.random_int(0, 7));
        assert!(matches!(
            &event.properties.details,
            EventDetails::AutoClick { target_text, .. } if *target_text == target
        ));
        assert_eq!(event.user_age, expected.random_int(10, 49));
        assert_eq!(rng, expected);
    }

    #[test]
    fn test_auto_click_json_has_null_campaign_and_empty_utm() {
        let mut rng = SeededRandom::new(4);
        let schema = AutoClickSchema::new(ClientPool::empty(), 0.0);
        let value = serde_json::to_value(schema.synthesize(&mut rng)).unwrap();

        assert!(value["context"]["traffic_source"]["campaign"].is_null());
        assert_eq!(value["context"]["utm_params"], serde_json::json!({}));
        assert_eq!(value["properties"]["is_button"], true);
    }
}
