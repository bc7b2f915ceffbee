#![allow(clippy::unwrap_used)]
// Integration tests for `Charger` against a wiremock device.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alfen_api::{AlfenClient, Credentials};
use alfen_core::{ChargeStatus, Charger, ChargerConfig, CoreError, ids};

// ── Helpers ─────────────────────────────────────────────────────────

const TTL: Duration = Duration::from_secs(5);

async fn setup_with_ttl(ttl: Duration) -> (MockServer, Charger) {
    let server = MockServer::start().await;
    let client = AlfenClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Credentials::admin(SecretString::from("secret".to_string())),
    );
    let tracked = ids::TRACKED.iter().map(|id| (*id).to_owned()).collect();
    (server, Charger::from_client(client, ttl, tracked))
}

async fn setup() -> (MockServer, Charger) {
    setup_with_ttl(TTL).await
}

fn prop(id: &str, value: serde_json::Value) -> serde_json::Value {
    json!({ "id": id, "access": 1, "type": 2, "len": 0, "cat": "generic", "value": value })
}

fn page(state: f64, max_current: f64) -> serde_json::Value {
    json!({
        "version": 2,
        "offset": 0,
        "total": 14,
        "properties": [
            prop(ids::BOOTUPS, json!(42)),
            prop(ids::BOOT_REASON, json!("Watchdog")),
            prop(ids::UPTIME, json!(86_400_000)),
            prop(ids::MAX_STATION_CURRENT, json!(max_current)),
            prop(ids::VOLTAGE_L1, json!(230.1)),
            prop(ids::VOLTAGE_L2, json!(231.2)),
            prop(ids::VOLTAGE_L3, json!(229.8)),
            prop(ids::ACTIVE_POWER_TOTAL, json!(11_040.0)),
            prop(ids::METER_READING, json!(1_234_500.0)),
            prop(ids::CURRENT_L1, json!(16.0)),
            prop(ids::CURRENT_L2, json!(15.9)),
            prop(ids::CURRENT_L3, json!(16.1)),
            prop(ids::STATE, json!(state)),
            prop(ids::CONNECTOR_MAX_ALLOWED_PHASES, json!(3))
        ]
    })
}

async fn mount_props(server: &MockServer, body: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .named("property fetch")
        .mount(server)
        .await;
}

async fn mount_writes(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .named("property write")
        .mount(server)
        .await;
}

fn write_of(id: &str, value: &str) -> serde_json::Value {
    json!({ id: { "id": id, "value": value } })
}

// ── Cache behavior ──────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_share_one_fetch() {
    let (server, charger) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(11.0, 16.0))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let charger = charger.clone();
            tokio::spawn(async move { charger.snapshot().await })
        })
        .collect();

    let mut snapshots = Vec::new();
    for handle in handles {
        snapshots.push(handle.await.unwrap().unwrap());
    }

    assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
}

#[tokio::test]
async fn test_readings_within_ttl_reuse_snapshot() {
    let (server, charger) = setup().await;
    mount_props(&server, page(11.0, 16.0), 1).await;

    assert_eq!(charger.status().await.unwrap(), ChargeStatus::Charging);
    assert!((charger.current_power().await.unwrap() - 11_040.0).abs() < f64::EPSILON);
    assert_eq!(charger.phases().await.unwrap(), 3);
    let currents = charger.currents().await.unwrap();
    assert!((currents.l2 - 15.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_expired_snapshot_is_fetched_again() {
    let (server, charger) = setup_with_ttl(Duration::ZERO).await;
    mount_props(&server, page(11.0, 16.0), 2).await;

    charger.status().await.unwrap();
    charger.status().await.unwrap();
}

#[tokio::test]
async fn test_failed_refresh_is_not_cached() {
    let (server, charger) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(4.0, 16.0)))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let first = charger.status().await;
    assert!(matches!(first, Err(CoreError::Api { status: Some(500), .. })));

    assert_eq!(charger.status().await.unwrap(), ChargeStatus::NoVehicle);
}

#[tokio::test]
async fn test_writes_do_not_invalidate_cache() {
    let (server, charger) = setup().await;
    mount_props(&server, page(11.0, 16.0), 1).await;
    mount_writes(&server, 200, 1).await;

    assert!(charger.is_enabled().await.unwrap());
    charger.enable(false).await.unwrap();
    assert!(charger.is_enabled().await.unwrap());
}

// ── Session recovery ────────────────────────────────────────────────

#[tokio::test]
async fn test_expired_session_recovers_transparently() {
    let (server, charger) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(11.0, 16.0)))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(charger.status().await.unwrap(), ChargeStatus::Charging);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_read_and_write_share_one_relogin() {
    let (server, charger) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/prop"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(100)))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(11.0, 16.0)))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;
    mount_writes(&server, 200, 1).await;

    let (status, write) = tokio::join!(charger.status(), charger.enable(true));

    assert_eq!(status.unwrap(), ChargeStatus::Charging);
    write.unwrap();
}

#[tokio::test]
async fn test_failed_relogin_surfaces_authentication_error() {
    let (server, charger) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prop"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = charger.status().await;
    assert!(
        matches!(result, Err(CoreError::AuthenticationFailed { .. })),
        "expected AuthenticationFailed, got: {result:?}"
    );
}

// ── Decoding ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unknown_status_code_is_an_error() {
    let (server, charger) = setup().await;
    mount_props(&server, page(999.0, 16.0), 1).await;

    let result = charger.status().await;
    assert_eq!(result, Err(CoreError::UnhandledStatus { code: 999.0 }));
}

#[tokio::test]
async fn test_enabled_threshold() {
    let (server, charger) = setup().await;
    mount_props(&server, page(7.0, 5.0), 1).await;
    assert!(!charger.is_enabled().await.unwrap());
    drop(server);

    let (server, charger) = setup().await;
    mount_props(&server, page(7.0, 16.0), 1).await;
    assert!(charger.is_enabled().await.unwrap());
}

#[tokio::test]
async fn test_energy_is_reported_in_kwh() {
    let (server, charger) = setup().await;
    mount_props(&server, page(11.0, 16.0), 1).await;

    let energy = charger.total_energy().await.unwrap();
    assert!((energy - 1234.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_missing_property_is_reported() {
    let (server, charger) = setup().await;
    mount_props(
        &server,
        json!({ "version": 2, "offset": 0, "total": 1, "properties": [prop(ids::STATE, json!(11))] }),
        1,
    )
    .await;

    let result = charger.max_current().await;
    match result {
        Err(CoreError::PropertyNotFound { id, available }) => {
            assert_eq!(id, ids::MAX_STATION_CURRENT);
            assert_eq!(available, "2501_2=11");
        }
        other => panic!("expected PropertyNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_string_property() {
    let (server, charger) = setup().await;
    mount_props(&server, page(11.0, 16.0), 1).await;

    assert_eq!(charger.read_string(ids::BOOT_REASON).await.unwrap(), "Watchdog");
    assert!(matches!(
        charger.read_string(ids::STATE).await,
        Err(CoreError::TypeMismatch { expected: "string", found: "number", .. })
    ));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_enable_writes_current_limits() {
    let (server, charger) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/prop"))
        .and(body_json(write_of(ids::MAX_STATION_CURRENT, "16")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/prop"))
        .and(body_json(write_of(ids::MAX_STATION_CURRENT, "5")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    charger.enable(true).await.unwrap();
    charger.enable(false).await.unwrap();
}

#[tokio::test]
async fn test_set_phases_writes_in_order() {
    let (server, charger) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/prop"))
        .and(body_json(write_of(ids::LOAD_BALANCING_ENABLE_PHASE_SWITCHING, "1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/prop"))
        .and(body_json(write_of(ids::INSTALLATION_MAX_ALLOWED_PHASES, "1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    charger.set_phases(1).await.unwrap();
}

#[tokio::test]
async fn test_set_phases_stops_after_first_failure() {
    let (server, charger) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/prop"))
        .and(body_json(write_of(ids::LOAD_BALANCING_ENABLE_PHASE_SWITCHING, "1")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/prop"))
        .and(body_json(write_of(ids::INSTALLATION_MAX_ALLOWED_PHASES, "3")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(charger.set_phases(3).await.is_err());
}

// ── Info / diagnosis ────────────────────────────────────────────────

#[tokio::test]
async fn test_info_is_not_cached() {
    let (server, charger) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Identity": "ACE0123456",
            "FWVersion": "6.4.0-4210",
            "Model": "NG910-60023",
            "ObjectId": "ACE0123456",
            "Type": "Wallbox"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let info = charger.info().await.unwrap();
    assert_eq!(info.firmware, "6.4.0-4210");
    charger.info().await.unwrap();
}

#[tokio::test]
async fn test_diagnose_collects_boot_counters() {
    let (server, charger) = setup().await;
    mount_props(&server, page(11.0, 16.0), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Model": "NG910-60023" })))
        .mount(&server)
        .await;

    let diagnosis = charger.diagnose().await.unwrap();
    assert_eq!(diagnosis.info.model, "NG910-60023");
    assert_eq!(diagnosis.bootups, Some(42));
    assert_eq!(diagnosis.boot_reason.as_deref(), Some("Watchdog"));
    assert_eq!(diagnosis.uptime, Some(86_400_000));
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_shutdown_twice_never_fails() {
    let (server, charger) = setup().await;
    mount_writes(&server, 200, 6).await;

    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    charger.shutdown().await;
    charger.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_survives_unreachable_device() {
    let (server, charger) = setup().await;
    mount_writes(&server, 200, 3).await;

    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    charger.shutdown().await;

    // Second round: every request fails at the transport level
    drop(server);
    charger.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_continues_past_failed_steps() {
    let (server, charger) = setup().await;
    mount_writes(&server, 500, 2).await;

    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    charger.shutdown().await;
}

#[tokio::test]
async fn test_connect_logs_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = ChargerConfig::new(
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("secret".to_string()),
    );
    let charger = Charger::connect(config).await.unwrap();
    assert_eq!(
        charger.client().session_state().await,
        alfen_api::SessionState::Authenticated
    );
}

#[tokio::test]
async fn test_connect_with_bad_password_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = ChargerConfig::new(
        Url::parse(&server.uri()).unwrap(),
        SecretString::from("wrong".to_string()),
    );
    let result = Charger::connect(config).await;
    assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));
}
