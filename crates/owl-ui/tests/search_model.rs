//! SearchModel suggestions against a mock geocoding server.

use std::sync::Arc;
use std::time::Duration;

use owl_core::Config;
use owl_ui::{AppServices, SearchError, SearchModel};
use tempfile::TempDir;
use tokio::runtime::Handle;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn place(name: &str) -> serde_json::Value {
    serde_json::json!({"name": name, "lat": 40.7, "lon": -74.0, "country": "US"})
}

fn services(server: &MockServer, dir: &TempDir) -> Arc<AppServices> {
    let mut config = Config::default();
    config.config_dir = dir.path().to_path_buf();
    config.api.api_key = Some("test-key".to_string());
    config.api.geocoding_base_url = format!("{}/geo/1.0", server.uri());
    config.api.weather_base_url = format!("{}/data/2.5", server.uri());
    config.search.debounce_ms = 50;
    AppServices::new(&config, Handle::current()).unwrap()
}

/// Poll until `done` holds or two seconds pass.
async fn poll_until(model: &mut SearchModel, done: impl Fn(&SearchModel) -> bool) {
    for _ in 0..200 {
        model.poll_channel();
        if done(model) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn direct_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/geo/1.0/direct")
        .count()
}

#[tokio::test]
async fn test_typing_produces_suggestions() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Jersey"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            place("Jersey City"),
            place("Jersey Shore")
        ])))
        .mount(&server)
        .await;

    let mut model = SearchModel::new(services(&server, &dir));
    for text in ["J", "Je", "Jer", "Jers", "Jerse", "Jersey"] {
        model.set_text(text);
    }
    poll_until(&mut model, |m| !m.suggestions().is_empty()).await;

    assert_eq!(model.text(), "Jersey");
    assert_eq!(model.suggestions().len(), 2);
    assert_eq!(model.suggestion(0).unwrap().name, "Jersey City");
    // Only the settled text reached the network
    assert_eq!(direct_requests(&server).await, 1);
}

#[tokio::test]
async fn test_clearing_text_empties_suggestions_without_lookup() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([place("Hoboken")])))
        .mount(&server)
        .await;

    let mut model = SearchModel::new(services(&server, &dir));
    model.set_text("Hoboken");
    poll_until(&mut model, |m| !m.suggestions().is_empty()).await;
    assert_eq!(model.suggestions().len(), 1);

    model.set_text("");
    poll_until(&mut model, |m| m.suggestions().is_empty()).await;

    assert!(model.suggestions().is_empty());
    assert_eq!(direct_requests(&server).await, 1);
}

#[tokio::test]
async fn test_failed_lookup_keeps_suggestions() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Trenton"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([place("Trenton")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Trentonx"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let mut model = SearchModel::new(services(&server, &dir));
    model.set_text("Trenton");
    poll_until(&mut model, |m| !m.suggestions().is_empty()).await;

    model.set_text("Trentonx");
    poll_until(&mut model, |m| m.last_error().is_some()).await;

    assert!(matches!(model.last_error(), Some(SearchError::Lookup { .. })));
    assert_eq!(model.suggestions().len(), 1);
    assert_eq!(model.suggestion(0).unwrap().name, "Trenton");
}

#[tokio::test]
async fn test_repeated_search_is_served_from_cache() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([place("Camden")])))
        .mount(&server)
        .await;

    let mut model = SearchModel::new(services(&server, &dir));
    model.set_text("Camden");
    poll_until(&mut model, |m| !m.suggestions().is_empty()).await;

    model.set_text("");
    poll_until(&mut model, |m| m.suggestions().is_empty()).await;

    model.set_text("camden ");
    poll_until(&mut model, |m| !m.suggestions().is_empty()).await;

    assert_eq!(model.suggestions().len(), 1);
    assert_eq!(direct_requests(&server).await, 1);
}

#[tokio::test]
async fn test_restart_ignores_previous_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([place("Princeton")]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let mut model = SearchModel::new(services(&server, &dir));
    model.set_text("Princeton");
    let first = model.session_id();

    // Let the lookup start, then replace the session
    tokio::time::sleep(Duration::from_millis(100)).await;
    model.restart_session();
    assert_ne!(model.session_id(), first);

    tokio::time::sleep(Duration::from_millis(400)).await;
    model.poll_channel();

    assert!(model.suggestions().is_empty());
}

#[tokio::test]
async fn test_shutdown_stops_sessions() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let services = services(&server, &dir);

    let mut model = SearchModel::new(services.clone());
    model.set_text("Paterson");
    assert!(model.session_id().is_some());

    services.shutdown();
    model.set_text("Passaic");

    assert!(model.session_id().is_none());
    tokio::time::sleep(Duration::from_millis(200)).await;
    model.poll_channel();
    assert!(model.suggestions().is_empty());
}
