use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use dotenvy::dotenv;
use rust_decimal_macros::dec;
use tracing::{error, info, warn};

use freight_routing::config::{CostingConfig, EnvironmentConfig};
use freight_routing::models::{
    Carrier, Coordinates, CreateContainerRequest, CreateShipmentRequest, Deposit, DepositRegistry,
    FareCatalog, FareTable, LegCatalog,
};
use freight_routing::services::{
    GeocodingService, JsonLinesSnapshotLog, ReferenceData, ShipmentLifecycle, SnapshotSink,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;
    let costing = CostingConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Freight Routing - Simulación de ciclo de vida");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    let resolver = GeocodingService::new(&config.geocoding)?;
    let reference = Arc::new(reference_data());

    // Una solicitud con IDs de depósito se rechaza antes de geocodificar
    let invalid = CreateShipmentRequest {
        id: 2,
        customer_id: Some(11),
        origin_address: Some("101".to_string()),
        destination_address: Some("103".to_string()),
        origin: None,
        destination: None,
        fare_table_id: Some(1),
    };
    match ShipmentLifecycle::create(invalid, &resolver, costing.clone(), Arc::clone(&reference)).await {
        Ok(_) => warn!("⚠️ La solicitud con IDs de depósito fue aceptada"),
        Err(e) => info!("🚫 Solicitud rechazada: {}", e),
    }

    let sink: Option<Box<dyn SnapshotSink + Send>> = match &config.snapshot_log_path {
        Some(path) => {
            info!("🗂️ Snapshots en {}", path.display());
            Some(Box::new(JsonLinesSnapshotLog::create(path)?))
        }
        None => None,
    };

    let input = CreateShipmentRequest {
        id: 1,
        customer_id: Some(10),
        origin_address: Some("-34.6,-58.4".to_string()),
        destination_address: Some("-35.0,-58.7".to_string()),
        origin: None,
        destination: None,
        fare_table_id: Some(1),
    };
    let mut lifecycle =
        ShipmentLifecycle::create_with_sink(input, &resolver, costing, reference, sink).await?;

    lifecycle.attach_container(CreateContainerRequest {
        id: 1,
        weight: Some(dec!(1000.0)),
        volume: Some(dec!(10.5)),
    })?;

    lifecycle.propose_routes()?;
    for option in lifecycle.route_options() {
        info!(
            "🛣️ Opción {}: {} tramos, distancia={} km, duración={} h, depósitos={:?}",
            option.option_index + 1,
            option.segment_count(),
            option.total_distance,
            option.total_duration,
            option.deposit_path
        );
    }

    // La opción más rápida queda en segundo lugar cuando no es la más corta
    let chosen = lifecycle
        .route_options()
        .get(1)
        .or_else(|| lifecycle.route_options().first())
        .map(|o| o.id)
        .ok_or_else(|| anyhow::anyhow!("no route options generated"))?;
    lifecycle.select_option(chosen)?;

    lifecycle.assign_carrier(Carrier {
        id: 1,
        license_plate: "ABC123".to_string(),
        max_weight: Some(dec!(20000)),
        max_volume: Some(dec!(50)),
        cost_per_km: Some(dec!(10.00)),
        avg_fuel_consumption: Some(dec!(0.2)),
        available: true,
        active: true,
    })?;

    lifecycle.execute_segments(Utc::now())?;
    let final_cost = lifecycle.settle()?;

    let request = lifecycle.request();
    info!(
        "✅ Solicitud {} liquidada: estimado={:?} final={} tiempo={:?} h",
        request.id, request.estimated_cost, final_cost, request.final_time
    );

    let gaps = lifecycle.required_field_gaps();
    if gaps.is_empty() {
        info!("✅ Todos los campos obligatorios poblados");
    } else {
        for gap in &gaps {
            warn!("⚠️ Campo faltante: {}", gap);
        }
    }

    let report = lifecycle.audit();
    for (entity, fields) in &report.never_populated {
        if fields.is_empty() {
            info!("📋 {}: completo", entity);
        } else {
            error!("📋 {}: nunca poblados {:?}", entity, fields);
        }
    }

    Ok(())
}

/// Red de depósitos, tramos y tarifa de la simulación
fn reference_data() -> ReferenceData {
    let deposit = |id, name: &str, latitude, longitude| Deposit {
        id,
        name: name.to_string(),
        location: Coordinates::new(latitude, longitude),
        nightly_fee: Some(dec!(20.00)),
    };

    ReferenceData {
        fares: FareCatalog::new(vec![FareTable {
            id: 1,
            management_fee: dec!(50.00),
            fuel_price: dec!(1.20),
        }]),
        deposits: DepositRegistry::new(vec![
            deposit(101, "Depósito Norte", dec!(-34.6), dec!(-58.4)),
            deposit(102, "Depósito Oeste", dec!(-34.7), dec!(-58.5)),
            deposit(103, "Depósito Sur", dec!(-35.0), dec!(-58.7)),
            deposit(104, "Depósito Este", dec!(-34.8), dec!(-58.45)),
        ]),
        legs: LegCatalog::new()
            .with_leg(101, 102, dec!(100.0), dec!(1.8))
            .with_leg(102, 103, dec!(180.0), dec!(3.0))
            .with_leg(101, 104, dec!(140.0), dec!(1.6))
            .with_leg(104, 103, dec!(220.0), dec!(2.7)),
    }
}
