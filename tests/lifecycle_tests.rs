use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use freight_routing::config::CostingConfig;
use freight_routing::models::{
    CapacityDimension, Carrier, Coordinates, CreateContainerRequest, CreateShipmentRequest,
    Deposit, DepositRegistry, FareCatalog, FareTable, LegCatalog, LifecycleState,
};
use freight_routing::services::geocoding_service::UnresolvedReason;
use freight_routing::services::{
    AddressResolver, JsonLinesSnapshotLog, ReferenceData, Resolution, ShipmentLifecycle,
};
use freight_routing::utils::{AppError, ErrorKind};

struct OfflineResolver;

#[async_trait]
impl AddressResolver for OfflineResolver {
    async fn geocode(&self, _address: &str) -> Resolution {
        Resolution::Unresolved {
            reason: UnresolvedReason::TokenUnavailable("offline".to_string()),
        }
    }
}

fn reference_data() -> Arc<ReferenceData> {
    let deposit = |id, latitude, longitude| Deposit {
        id,
        name: format!("Depósito {}", id),
        location: Coordinates::new(latitude, longitude),
        nightly_fee: Some(dec!(20.00)),
    };

    Arc::new(ReferenceData {
        fares: FareCatalog::new(vec![FareTable {
            id: 1,
            management_fee: dec!(50.00),
            fuel_price: dec!(1.20),
        }]),
        deposits: DepositRegistry::new(vec![
            deposit(101, dec!(-34.6), dec!(-58.4)),
            deposit(102, dec!(-34.7), dec!(-58.5)),
            deposit(103, dec!(-35.0), dec!(-58.7)),
            deposit(104, dec!(-34.8), dec!(-58.45)),
        ]),
        legs: LegCatalog::new()
            .with_leg(101, 102, dec!(100.0), dec!(1.8))
            .with_leg(102, 103, dec!(180.0), dec!(3.0))
            .with_leg(101, 104, dec!(140.0), dec!(1.6))
            .with_leg(104, 103, dec!(220.0), dec!(2.7)),
    })
}

fn shipment(origin: &str, destination: &str) -> CreateShipmentRequest {
    CreateShipmentRequest {
        id: 1,
        customer_id: Some(10),
        origin_address: Some(origin.to_string()),
        destination_address: Some(destination.to_string()),
        origin: None,
        destination: None,
        fare_table_id: Some(1),
    }
}

fn truck(max_weight: rust_decimal::Decimal) -> Carrier {
    Carrier {
        id: 1,
        license_plate: "ABC123".to_string(),
        max_weight: Some(max_weight),
        max_volume: Some(dec!(50)),
        cost_per_km: Some(dec!(10.00)),
        avg_fuel_consumption: Some(dec!(0.2)),
        available: true,
        active: true,
    }
}

fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
}

/// Solicitud con la opción más rápida (vía 104) ya seleccionada
async fn selected_lifecycle() -> ShipmentLifecycle {
    let mut lifecycle = ShipmentLifecycle::create(
        shipment("-34.6,-58.4", "-35.0,-58.7"),
        &OfflineResolver,
        CostingConfig::default(),
        reference_data(),
    )
    .await
    .unwrap();

    lifecycle
        .attach_container(CreateContainerRequest {
            id: 1,
            weight: Some(dec!(1000.0)),
            volume: Some(dec!(10.5)),
        })
        .unwrap();
    lifecycle.propose_routes().unwrap();
    let fastest = lifecycle.route_options()[1].id;
    lifecycle.select_option(fastest).unwrap();
    lifecycle
}

#[tokio::test]
async fn test_full_lifecycle_settles() {
    let mut lifecycle = selected_lifecycle().await;

    let options = lifecycle.route_options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].deposit_path, vec![101, 102, 103]);
    assert_eq!(options[0].total_distance, dec!(280.0));
    assert_eq!(options[1].deposit_path, vec![101, 104, 103]);
    assert_eq!(options[1].total_duration, dec!(4.3));

    // 140 × 8 + 220 × 8 + 2 × 50
    assert_eq!(lifecycle.request().estimated_cost, Some(dec!(2980.00)));
    assert_eq!(lifecycle.request().estimated_time, Some(dec!(4.3)));

    lifecycle.assign_carrier(truck(dec!(20000))).unwrap();
    lifecycle.execute_segments(morning()).unwrap();
    let final_cost = lifecycle.settle().unwrap();

    // 1433.60 + 2252.80 + 2 × 50
    assert_eq!(final_cost, dec!(3786.40));
    assert_eq!(lifecycle.request().final_cost, Some(dec!(3786.40)));
    assert_eq!(lifecycle.request().final_time, Some(dec!(4.3)));
    assert_eq!(lifecycle.state(), LifecycleState::Settled);
    assert!(lifecycle.required_field_gaps().is_empty());

    let steps: Vec<&str> = lifecycle.history().iter().map(|s| s.step.as_str()).collect();
    assert_eq!(
        steps,
        vec![
            "request_created",
            "container_attached",
            "route_options_generated",
            "option_selected",
            "carrier_assigned",
            "segments_executed",
            "route_settled",
        ]
    );
}

#[tokio::test]
async fn test_settlement_is_idempotent() {
    let mut lifecycle = selected_lifecycle().await;
    lifecycle.assign_carrier(truck(dec!(20000))).unwrap();
    lifecycle.execute_segments(morning()).unwrap();

    let first = lifecycle.settle().unwrap();
    let history_len = lifecycle.history().len();
    let second = lifecycle.settle().unwrap();

    assert_eq!(first, second);
    assert_eq!(lifecycle.request().final_cost, Some(first));
    assert_eq!(lifecycle.history().len(), history_len);
}

#[tokio::test]
async fn test_overweight_container_rejected() {
    let mut lifecycle = selected_lifecycle().await;

    let err = lifecycle.assign_carrier(truck(dec!(500))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert!(matches!(
        err,
        AppError::CapacityExceeded {
            dimension: CapacityDimension::Weight,
            ..
        }
    ));

    assert_eq!(lifecycle.state(), LifecycleState::RouteSelected);
    let route = lifecycle.route().unwrap();
    assert!(route.segments.iter().all(|s| s.carrier_plate.is_none()));

    // otro camión con capacidad suficiente sí se asigna
    lifecycle.assign_carrier(truck(dec!(20000))).unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::CarrierAssigned);
}

#[tokio::test]
async fn test_layover_charged_across_midnight() {
    let mut lifecycle = selected_lifecycle().await;
    lifecycle.assign_carrier(truck(dec!(20000))).unwrap();

    // fin 21:36, siguiente inicio 01:36 del día siguiente
    let evening = Utc.with_ymd_and_hms(2024, 3, 4, 20, 0, 0).unwrap();
    lifecycle.execute_segments(evening).unwrap();

    let route = lifecycle.route().unwrap();
    assert_eq!(route.segments[0].real_cost, Some(dec!(1453.60)));
    assert_eq!(route.segments[1].real_cost, Some(dec!(2252.80)));
    assert_eq!(lifecycle.settle().unwrap(), dec!(3806.40));
}

#[tokio::test]
async fn test_skipped_transition_rejected() {
    let mut lifecycle = ShipmentLifecycle::create(
        shipment("-34.6,-58.4", "-35.0,-58.7"),
        &OfflineResolver,
        CostingConfig::default(),
        reference_data(),
    )
    .await
    .unwrap();

    let err = lifecycle.assign_carrier(truck(dec!(20000))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lifecycle);
    assert!(lifecycle.execute_segments(morning()).is_err());
    assert_eq!(lifecycle.state(), LifecycleState::Created);
    assert_eq!(lifecycle.history().len(), 1);
}

#[tokio::test]
async fn test_deposit_identifier_rejected() {
    let result = ShipmentLifecycle::create(
        shipment("101", "103"),
        &OfflineResolver,
        CostingConfig::default(),
        reference_data(),
    )
    .await;
    assert!(matches!(
        result,
        Err(AppError::DepositIdentifierInAddress {
            field: "origin_address",
            ..
        })
    ));
}

#[tokio::test]
async fn test_unresolved_address_blocks_route_proposal() {
    let mut lifecycle = ShipmentLifecycle::create(
        shipment("Av. Ejemplo 123, CABA", "-35.0,-58.7"),
        &OfflineResolver,
        CostingConfig::default(),
        reference_data(),
    )
    .await
    .unwrap();

    assert!(lifecycle.request().origin().is_none());
    assert_eq!(
        lifecycle.request().destination(),
        Some(Coordinates::new(dec!(-35.0), dec!(-58.7)))
    );

    lifecycle
        .attach_container(CreateContainerRequest {
            id: 1,
            weight: Some(dec!(1000.0)),
            volume: None,
        })
        .unwrap();
    let err = lifecycle.propose_routes().unwrap_err();
    assert!(matches!(err, AppError::UnresolvedLocation(_)));
    assert_eq!(lifecycle.state(), LifecycleState::ContainerAttached);
}

#[tokio::test]
async fn test_audit_after_full_run() {
    let mut lifecycle = selected_lifecycle().await;
    let mut carrier = truck(dec!(20000));
    carrier.avg_fuel_consumption = None;
    lifecycle.assign_carrier(carrier).unwrap();
    lifecycle.execute_segments(morning()).unwrap();
    lifecycle.settle().unwrap();

    let report = lifecycle.audit();
    assert_eq!(report.fields_for("carrier"), vec!["avg_fuel_consumption"]);
    assert!(report.fields_for("request").is_empty());
    assert!(report.fields_for("segment").is_empty());
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_snapshots_written_as_json_lines() {
    let path = std::env::temp_dir().join(format!("freight-snapshots-{}.jsonl", uuid::Uuid::new_v4()));
    let sink = JsonLinesSnapshotLog::create(&path).unwrap();

    let mut lifecycle = ShipmentLifecycle::create_with_sink(
        shipment("-34.6,-58.4", "-35.0,-58.7"),
        &OfflineResolver,
        CostingConfig::default(),
        reference_data(),
        Some(Box::new(sink)),
    )
    .await
    .unwrap();
    lifecycle
        .attach_container(CreateContainerRequest {
            id: 1,
            weight: Some(dec!(1000.0)),
            volume: Some(dec!(10.5)),
        })
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["step"], "request_created");
    assert_eq!(lines[1]["state"], "CONTAINER_ATTACHED");

    std::fs::remove_file(&path).ok();
}
