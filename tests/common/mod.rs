//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::time::Duration;

use sensesketch::api::ApiClient;
use sensesketch::config::AppConfig;
use sensesketch::domain::Point;
use sensesketch::drawing::{DrawingSurface, GestureEvent};

/// Client pointed at a mock server with short timeouts.
pub fn client_for(base_url: &str) -> ApiClient {
    ApiClient::with_timeouts(base_url, Duration::from_secs(5), Duration::from_secs(2))
        .expect("Failed to build client")
}

/// Small mounted surface so tests encode quickly.
pub fn small_surface() -> DrawingSurface {
    let config = AppConfig {
        surface_width: 64,
        surface_height: 64,
        ..AppConfig::default()
    };
    DrawingSurface::mounted(&config)
}

/// Draw one stroke through the gesture path.
pub fn draw(surface: &mut DrawingSurface, points: &[(f32, f32)]) {
    let mut points = points.iter().copied().map(Point::from);
    let Some(first) = points.next() else {
        return;
    };
    surface.handle_gesture(GestureEvent::Start(first));
    for point in points {
        surface.handle_gesture(GestureEvent::Move(point));
    }
    surface.handle_gesture(GestureEvent::End);
}

pub const TWO_INTENTS: &str = r#"{
    "intents": [
        {"label": "Thirsty", "confidence": 0.62, "category": "need", "reasoning": "A cup shape"},
        {"label": "Cup", "confidence": 0.91, "category": "object", "reasoning": "Round outline with a handle"}
    ]
}"#;
