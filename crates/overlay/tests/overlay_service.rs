//! End-to-end tests of the overlay pipeline against an in-memory transport.

use std::sync::Arc;

use outlook_common::{Color, ErrorKind, Geometry, ProductFamily, RequestKey};
use overlay::OverlayService;
use renderer::StyleOverrides;
use storage::{MemoryTransport, StorageConfig};
use test_utils::{
    assert_coords_approx_eq, outlook_geojson, temp_test_dir, write_fixture, CATEGORICAL_ROWS,
    DRYT_ROWS, HAIL_ROWS, MD_0412_TEXT, SIGHAIL_ROWS,
};

const BASE: &str = "http://spc.test";

fn convective_url(hazard: &str) -> String {
    format!(
        "{}/products/outlook/archive/2020/day1otlk_20200412_1630_{}.lyr.geojson",
        BASE, hazard
    )
}

fn service(dir: &std::path::Path, transport: Arc<MemoryTransport>) -> OverlayService {
    let config = StorageConfig::default()
        .with_data_dir(dir)
        .with_base_url(BASE);
    OverlayService::with_transport(config, transport)
}

fn day1(hazard: &str) -> RequestKey {
    RequestKey::new(1, Some(1630), 2020, 4, 12, Some(hazard)).unwrap()
}

#[tokio::test]
async fn test_repeated_requests_fetch_once() {
    let dir = temp_test_dir();
    let transport = Arc::new(
        MemoryTransport::new().with_response(convective_url("cat"), outlook_geojson(&CATEGORICAL_ROWS)),
    );
    let service = service(dir.path(), transport.clone());
    let overrides = StyleOverrides::new();

    let first = service.convective_outlook(day1("cat"), &overrides).await.unwrap();
    let second = service.convective_outlook(day1("cat"), &overrides).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(first.records(), second.records());
    assert!(Arc::ptr_eq(&first.shared_records(), &second.shared_records()));
    assert_eq!(first.short_labels(), &["TSTM", "MRGL", "SLGT"]);

    let stats = service.cache_stats().await;
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
}

#[tokio::test]
async fn test_new_service_reuses_files_on_disk() {
    let dir = temp_test_dir();
    let transport = Arc::new(
        MemoryTransport::new().with_response(convective_url("cat"), outlook_geojson(&CATEGORICAL_ROWS)),
    );

    service(dir.path(), transport.clone())
        .convective_outlook(day1("cat"), &StyleOverrides::new())
        .await
        .unwrap();
    service(dir.path(), transport.clone())
        .convective_outlook(day1("cat"), &StyleOverrides::new())
        .await
        .unwrap();

    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_hail_layer_excludes_significant_polygon() {
    let dir = temp_test_dir();
    let transport = Arc::new(
        MemoryTransport::new().with_response(convective_url("hail"), outlook_geojson(&HAIL_ROWS)),
    );
    let service = service(dir.path(), transport);

    let hail = service
        .convective_outlook(day1("hail"), &StyleOverrides::new())
        .await
        .unwrap();

    assert_eq!(hail.short_labels(), &["0.05", "0.15"]);
    let geometries = hail.geometries();
    assert_eq!(geometries.len(), 2);
    for (geometry, record) in geometries.iter().zip(hail.records()) {
        assert_eq!(geometry, &record.geometry);
    }
    assert_eq!(
        hail.style.facecolors,
        vec![Color::hex("#9d4e15"), Color::hex("#FFE066")]
    );
}

#[tokio::test]
async fn test_sighail_layer_is_hatched() {
    let dir = temp_test_dir();
    let transport = Arc::new(
        MemoryTransport::new()
            .with_response(convective_url("sighail"), outlook_geojson(&SIGHAIL_ROWS)),
    );
    let service = service(dir.path(), transport);

    let sig = service
        .convective_outlook(day1("sighail"), &StyleOverrides::new())
        .await
        .unwrap();

    assert!(sig.style.facecolors.iter().all(Color::is_none));
    assert_eq!(sig.style.hatch.as_ref().map(|h| h.as_str()), Some("SS"));
}

#[tokio::test]
async fn test_facecolor_override_wins() {
    let dir = temp_test_dir();
    let transport = Arc::new(
        MemoryTransport::new().with_response(convective_url("cat"), outlook_geojson(&CATEGORICAL_ROWS)),
    );
    let service = service(dir.path(), transport);

    let overrides = StyleOverrides::new().with_facecolor("#123456").with_zorder(5.0);
    let cat = service.convective_outlook(day1("cat"), &overrides).await.unwrap();

    assert!(cat.style.facecolors.iter().all(|c| *c == Color::hex("#123456")));
    assert_eq!(cat.style.zorder, Some(5.0));
}

#[tokio::test]
async fn test_hazards_are_cached_separately() {
    let dir = temp_test_dir();
    let transport = Arc::new(
        MemoryTransport::new()
            .with_response(convective_url("hail"), outlook_geojson(&HAIL_ROWS))
            .with_response(convective_url("sighail"), outlook_geojson(&SIGHAIL_ROWS)),
    );
    let service = service(dir.path(), transport.clone());
    let overrides = StyleOverrides::new();

    let hail = service.convective_outlook(day1("hail"), &overrides).await.unwrap();
    let sig = service.convective_outlook(day1("sighail"), &overrides).await.unwrap();

    assert_eq!(hail.records().len(), 2);
    assert_eq!(sig.records().len(), 1);
    assert_eq!(transport.calls(), 2);
    assert_eq!(service.cache_stats().await.entries, 2);
}

#[tokio::test]
async fn test_extended_convective_ignores_time_and_hazard() {
    let dir = temp_test_dir();
    let url = format!(
        "{}/products/exper/day4-8/archive/2020/day4prob_20200412.lyr.geojson",
        BASE
    );
    let rows = [("0.15", "15% Severe Risk", "#DDAA00", "#FFE066")];
    let transport = Arc::new(MemoryTransport::new().with_response(url, outlook_geojson(&rows)));
    let service = service(dir.path(), transport.clone());
    let overrides = StyleOverrides::new();

    let plain = RequestKey::new(4, None, 2020, 4, 12, None).unwrap();
    let noisy = RequestKey::new(4, Some(1630), 2020, 4, 12, Some("cat")).unwrap();

    let a = service.convective_outlook(plain, &overrides).await.unwrap();
    let b = service.convective_outlook(noisy, &overrides).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(a.request, b.request);
    assert_eq!(a.request.hazard, None);
    assert_eq!(
        a.legend().unwrap().iter().map(|e| e.label.as_str()).collect::<Vec<_>>(),
        vec!["30%", "15%"]
    );
}

#[tokio::test]
async fn test_fire_dry_thunder_from_pre_existing_bundle() {
    let bundle = temp_test_dir();
    let data = temp_test_dir();
    write_fixture(
        bundle.path(),
        "geoJSON/SPC/fire_outlook/2020/day1fw_20200412_1700_dryt.geojson",
        &outlook_geojson(&DRYT_ROWS),
    );

    let transport = Arc::new(MemoryTransport::new());
    let config = StorageConfig::default()
        .with_data_dir(data.path())
        .with_pre_existing_data_dir(bundle.path())
        .with_base_url(BASE);
    let service = OverlayService::with_transport(config, transport.clone());

    let request = RequestKey::new(1, Some(1700), 2020, 4, 12, Some("dryt")).unwrap();
    let dryt = service
        .fire_outlook(request, &StyleOverrides::new())
        .await
        .unwrap();

    assert_eq!(transport.calls(), 0);
    assert_eq!(dryt.style.facecolors, vec![Color::None, Color::None]);
    assert_eq!(dryt.style.hatch.as_ref().map(|h| h.as_str()), Some("xx"));
    assert_eq!(dryt.family, ProductFamily::Fire);
}

#[tokio::test]
async fn test_fetch_failure_propagates_and_is_retried() {
    let dir = temp_test_dir();
    let transport = Arc::new(MemoryTransport::new().with_status(convective_url("torn"), 500));
    let service = service(dir.path(), transport.clone());

    let err = service
        .convective_outlook(day1("torn"), &StyleOverrides::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(err.to_string().contains(&convective_url("torn")));

    // Nothing was cached, so the next request goes back to the network.
    let _ = service
        .convective_outlook(day1("torn"), &StyleOverrides::new())
        .await;
    assert_eq!(transport.calls(), 2);
    assert_eq!(service.cache_stats().await.entries, 0);
}

#[tokio::test]
async fn test_missing_issuance_time_is_rejected_before_fetching() {
    let dir = temp_test_dir();
    let transport = Arc::new(MemoryTransport::new());
    let service = service(dir.path(), transport.clone());

    let request = RequestKey::new(2, None, 2020, 4, 12, Some("cat")).unwrap();
    let err = service
        .convective_outlook(request, &StyleOverrides::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parameter);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_mesoscale_discussion() {
    let dir = temp_test_dir();
    let url = format!("{}/products/md/2023/md0412.txt", BASE);
    let transport = Arc::new(MemoryTransport::new().with_response(url, MD_0412_TEXT));
    let service = service(dir.path(), transport.clone());

    let overrides = StyleOverrides::new().with_edgecolor("red").with_linewidth(2.0);
    let md = service.discussion(2023, 412, &overrides).await.unwrap();
    let again = service.discussion(2023, 412, &overrides).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(md.records(), again.records());
    assert_eq!(md.records()[0].attribute("number"), Some(&serde_json::json!(412)));
    assert_eq!(md.style.linewidth, Some(2.0));

    match &md.geometries()[0] {
        Geometry::Polygon { coordinates } => {
            let [lon, lat] = coordinates[0][0];
            assert_coords_approx_eq!((lon, lat), (-96.50, 35.23), 1e-9);
        }
        other => panic!("Expected polygon, got {:?}", other),
    }

    assert!(dir.path().join("geoJSON/SPC/md/2023/md0412.geojson").is_file());
}

#[tokio::test]
async fn test_discussion_number_is_validated() {
    let dir = temp_test_dir();
    let service = service(dir.path(), Arc::new(MemoryTransport::new()));

    let err = service
        .discussion(2023, 0, &StyleOverrides::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parameter);
}
