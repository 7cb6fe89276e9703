//! End-to-end verification flows against mock provider servers.

use std::time::Duration;

use geoverify_core::{AppConfig, CoordinateInput, Source, ORIGINAL_FALLBACK_CONFIDENCE};
use geoverify_engine::Verifier;
use geoverify_providers::{NominatimClient, RadarClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn eiffel_input() -> CoordinateInput {
    CoordinateInput {
        lat: 48.8584,
        lng: 2.2945,
        context: "Eiffel Tower".to_owned(),
        location_name: "Paris".to_owned(),
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        cache_enabled: false,
        nominatim_interval_ms: 0,
        timeout_ms: 2000,
        ..AppConfig::default()
    }
}

fn nominatim_for(server: &MockServer) -> NominatimClient {
    NominatimClient::with_base_url(
        "geoverify-tests/0.1",
        Duration::ZERO,
        Duration::from_secs(2),
        &server.uri(),
    )
    .unwrap()
}

fn radar_for(server: &MockServer) -> RadarClient {
    RadarClient::with_base_url("prv_test_key", Duration::from_secs(2), &server.uri()).unwrap()
}

/// A reverse geocode agreeing to within a meter, detailed enough to pass
/// the fast-accept quality gate.
async fn mount_agreeing_nominatim(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "lat": "48.858405",
            "lon": "2.294510",
            "display_name": "Eiffel Tower, 5 Avenue Anatole France, Paris, France",
            "class": "tourism",
            "importance": 0.9
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "display_name": "Eiffel Tower, Paris",
            "importance": 0.9
        }])))
        .mount(server)
        .await;
}

/// A reverse geocode roughly 400 m off, with a sparse address.
async fn mount_disagreeing_nominatim(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "lat": "48.8620",
            "lon": "2.2945",
            "display_name": "Avenue de Suffren, Paris"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn agreeing_free_provider_fast_accepts_without_touching_the_paid_one() {
    let nominatim_server = MockServer::start().await;
    let radar_server = MockServer::start().await;
    mount_agreeing_nominatim(&nominatim_server).await;
    // The paid provider must not be consulted at all on a fast accept.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&radar_server)
        .await;

    let verifier = Verifier::with_clients(
        test_config(),
        Some(nominatim_for(&nominatim_server)),
        Some(radar_for(&radar_server)),
    );

    let result = verifier.verify(&eiffel_input()).await;

    assert_eq!(result.source, Source::Nominatim);
    assert!(result.is_valid);
    assert!(result.confidence > 0.9, "got {}", result.confidence);
    assert!(result.metadata.distance_from_original.unwrap() < 5.0);
    assert!(result.metadata.address.is_some());

    let stats = verifier.performance_stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.nominatim_only, 1);
    assert_eq!(stats.radar_calls_saved, 1);
    assert_eq!(stats.escalations, 0);
}

#[tokio::test]
async fn disagreement_escalates_and_the_paid_provider_wins() {
    let nominatim_server = MockServer::start().await;
    let radar_server = MockServer::start().await;
    mount_disagreeing_nominatim(&nominatim_server).await;
    Mock::given(method("GET"))
        .and(path("/geocode/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "addresses": [{
                "latitude": 48.858425,
                "longitude": 2.294520,
                "formattedAddress": "Eiffel Tower, Champ de Mars, Paris, France",
                "confidence": "exact"
            }]
        })))
        .mount(&radar_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": [{
                "name": "Eiffel Tower",
                "categories": ["tourism-landmark"]
            }]
        })))
        .mount(&radar_server)
        .await;

    let verifier = Verifier::with_clients(
        test_config(),
        Some(nominatim_for(&nominatim_server)),
        Some(radar_for(&radar_server)),
    );

    let result = verifier.verify(&eiffel_input()).await;

    assert_eq!(result.source, Source::Radar);
    assert!(result.is_valid);
    assert!(result.confidence > 0.9, "got {}", result.confidence);
    assert!(result.metadata.distance_from_original.unwrap() < 10.0);
    assert_eq!(result.metadata.place_type.as_deref(), Some("tourism-landmark"));

    let stats = verifier.performance_stats();
    assert_eq!(stats.escalations, 1);
    assert_eq!(stats.nominatim_only, 0);
}

#[tokio::test]
async fn total_disagreement_falls_back_to_the_original_coordinate() {
    let nominatim_server = MockServer::start().await;
    let radar_server = MockServer::start().await;
    mount_disagreeing_nominatim(&nominatim_server).await;
    // The paid provider also lands ~400 m away with a weak grade.
    Mock::given(method("GET"))
        .and(path("/geocode/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "addresses": [{
                "latitude": 48.8620,
                "longitude": 2.2945,
                "formattedAddress": "Avenue de Suffren, Paris, France",
                "confidence": "fallback"
            }]
        })))
        .mount(&radar_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": []
        })))
        .mount(&radar_server)
        .await;

    let input = eiffel_input();
    let verifier = Verifier::with_clients(
        test_config(),
        Some(nominatim_for(&nominatim_server)),
        Some(radar_for(&radar_server)),
    );

    let result = verifier.verify(&input).await;

    assert_eq!(result.source, Source::Original);
    assert!((result.confidence - ORIGINAL_FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
    assert!(result.is_valid, "fallback_to_original defaults to true");
    assert!((result.coordinates.lat - input.lat).abs() < f64::EPSILON);
    assert!((result.coordinates.lng - input.lng).abs() < f64::EPSILON);
}

#[tokio::test]
async fn second_identical_request_is_served_from_the_cache() {
    let nominatim_server = MockServer::start().await;
    mount_agreeing_nominatim(&nominatim_server).await;

    let config = AppConfig {
        cache_enabled: true,
        ..test_config()
    };
    let verifier = Verifier::with_clients(config, Some(nominatim_for(&nominatim_server)), None);

    let first = verifier.verify(&eiffel_input()).await;
    let second = verifier.verify(&eiffel_input()).await;

    assert_eq!(first.source, Source::Nominatim);
    assert_eq!(second.source, Source::Cache);
    assert!((second.confidence - first.confidence).abs() < f64::EPSILON);
    assert_eq!(second.coordinates, first.coordinates);
    assert_eq!(verifier.cache_size(), 1);

    let stats = verifier.performance_stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.cache_hits, 1);

    // Two upstream round trips total, both from the first call.
    assert_eq!(nominatim_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn free_provider_outage_degrades_to_the_original_with_diagnostics() {
    let nominatim_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&nominatim_server)
        .await;

    let verifier =
        Verifier::with_clients(test_config(), Some(nominatim_for(&nominatim_server)), None);

    let result = verifier.verify(&eiffel_input()).await;

    assert_eq!(result.source, Source::Original);
    assert!((result.confidence - ORIGINAL_FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
    assert!(result.error.as_deref().unwrap().contains("free provider"));
}

#[tokio::test]
async fn with_every_provider_disabled_the_fallback_flag_decides_validity() {
    let config = AppConfig {
        fallback_to_original: false,
        ..test_config()
    };
    let verifier = Verifier::with_clients(config, None, None);

    let result = verifier.verify(&eiffel_input()).await;

    assert_eq!(result.source, Source::Original);
    assert!(!result.is_valid);
    assert!((result.confidence - ORIGINAL_FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
}

#[tokio::test]
async fn paid_provider_alone_can_carry_a_resolution() {
    let radar_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "addresses": [{
                "latitude": 48.858425,
                "longitude": 2.294520,
                "formattedAddress": "Eiffel Tower, Champ de Mars, Paris, France",
                "confidence": "exact"
            }]
        })))
        .mount(&radar_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": []
        })))
        .mount(&radar_server)
        .await;

    let verifier = Verifier::with_clients(test_config(), None, Some(radar_for(&radar_server)));

    let result = verifier.verify(&eiffel_input()).await;

    assert_eq!(result.source, Source::Radar);
    assert!(result.is_valid);
    assert_eq!(verifier.performance_stats().escalations, 1);
}

#[tokio::test]
async fn batch_results_preserve_input_order() {
    let verifier = Verifier::with_clients(test_config(), None, None);

    let inputs: Vec<CoordinateInput> = (0..25)
        .map(|i| CoordinateInput {
            lat: f64::from(i),
            lng: 0.0,
            context: format!("place {i}"),
            location_name: "Nowhereville".to_owned(),
        })
        .collect();

    let results = verifier.batch_verify(inputs).await;

    assert_eq!(results.len(), 25);
    for (i, result) in results.iter().enumerate() {
        assert!((result.coordinates.lat - f64::from(u32::try_from(i).unwrap())).abs()
            < f64::EPSILON);
        assert_eq!(result.source, Source::Original);
    }
    assert_eq!(verifier.performance_stats().total_requests, 25);
}

#[tokio::test]
async fn stats_reset_clears_the_counters() {
    let verifier = Verifier::with_clients(test_config(), None, None);
    let _ = verifier.verify(&eiffel_input()).await;
    assert_eq!(verifier.performance_stats().total_requests, 1);

    verifier.reset_stats();
    let stats = verifier.performance_stats();
    assert_eq!(stats.total_requests, 0);
    assert!((stats.average_response_time_ms - 0.0).abs() < f64::EPSILON);
}
