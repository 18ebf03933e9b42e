//! Selección de opción y asignación de camión
//!
//! `select_option` compromete los tramos de una opción en la ruta;
//! `assign_carrier` valida capacidad y asigna el dominio a cada tramo.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::models::carrier::{CapacityDimension, Carrier};
use crate::models::container::Container;
use crate::models::route::{Route, RouteOption};
use crate::services::costing_service::approximate_cost;
use crate::utils::errors::{conflict_error, validation_error, AppError, AppResult};
use crate::utils::ids::IdSequence;

/// Comprometer la opción elegida como tramos propios de la ruta.
///
/// Re-seleccionar la misma opción no modifica los tramos ya comprometidos.
pub fn select_option(
    route: &mut Route,
    option: &RouteOption,
    base_rate_per_km: Decimal,
    ids: &mut IdSequence,
) -> AppResult<()> {
    if option.route_id != route.id {
        return Err(validation_error("route option belongs to a different route"));
    }

    match route.selected_option_id {
        Some(selected) if selected == option.id && !route.segments.is_empty() => {
            info!("🔁 Opción {} ya seleccionada en ruta {}", option.id, route.id);
            return Ok(());
        }
        Some(selected) if selected != option.id => {
            return Err(conflict_error(
                &format!("Route {}", route.id),
                "selected option",
                &selected.to_string(),
            ));
        }
        _ => {}
    }

    let mut segments: Vec<_> = option
        .segments
        .iter()
        .map(|candidate| {
            let mut segment = candidate.committed_copy(ids.next_id());
            segment.approximate_cost = Some(approximate_cost(&segment, base_rate_per_km));
            segment
        })
        .collect();
    segments.sort_by_key(|s| s.order);

    route.segments = segments;
    route.selected_option_id = Some(option.id);

    info!(
        "✅ Opción {} (índice {}) comprometida en ruta {} con {} tramos",
        option.id,
        option.option_index,
        route.id,
        route.segments.len()
    );
    Ok(())
}

/// Validar que el contenedor entra en el camión
pub fn check_capacity(container: &Container, carrier: &Carrier) -> AppResult<()> {
    check_dimension(CapacityDimension::Weight, container.weight, carrier.max_weight)?;
    check_dimension(CapacityDimension::Volume, container.volume, carrier.max_volume)
}

fn check_dimension(
    dimension: CapacityDimension,
    required: Option<Decimal>,
    capacity: Option<Decimal>,
) -> AppResult<()> {
    match (required, capacity) {
        (Some(required), Some(capacity)) if required > capacity => {
            Err(AppError::CapacityExceeded {
                dimension,
                required,
                capacity,
            })
        }
        _ => Ok(()),
    }
}

/// Asignar el camión a todos los tramos comprometidos.
///
/// Si alguna validación falla no se asigna ningún tramo.
pub fn assign_carrier(
    route: &mut Route,
    carrier: &Carrier,
    container: Option<&Container>,
    request_id: u64,
) -> AppResult<()> {
    let container = container.ok_or(AppError::MissingContainer { request_id })?;

    if !carrier.is_assignable() {
        return Err(AppError::CarrierUnavailable(format!(
            "carrier {} is not available/active",
            carrier.license_plate
        )));
    }

    if route.segments.is_empty() {
        return Err(validation_error("route has no committed segments"));
    }

    for segment in &route.segments {
        if let Err(e) = check_capacity(container, carrier) {
            warn!(
                "❌ Camión {} rechazado en tramo {}: {}",
                carrier.license_plate, segment.order, e
            );
            return Err(e);
        }
    }

    for segment in &mut route.segments {
        segment.carrier_plate = Some(carrier.license_plate.clone());
    }

    info!(
        "🚚 Camión {} asignado a {} tramos de ruta {}",
        carrier.license_plate,
        route.segments.len(),
        route.id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::segment::Segment;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn candidate(id: u64, order: u32, distance: Decimal) -> Segment {
        Segment {
            id,
            order,
            origin_deposit_id: 100 + order as u64,
            destination_deposit_id: 101 + order as u64,
            origin_latitude: None,
            origin_longitude: None,
            destination_latitude: None,
            destination_longitude: None,
            distance: Some(distance),
            duration: Some(dec!(1.5)),
            carrier_plate: None,
            approximate_cost: Some(dec!(1)),
            real_cost: None,
            actual_start: None,
            actual_end: None,
        }
    }

    fn option(id: u64) -> RouteOption {
        RouteOption {
            id,
            route_id: 1,
            option_index: 0,
            total_distance: dec!(360),
            total_duration: dec!(3.0),
            deposit_path: vec![101, 102, 103],
            segments: vec![candidate(3, 1, dec!(140)), candidate(4, 2, dec!(220))],
        }
    }

    fn carrier(max_weight: Decimal, max_volume: Decimal) -> Carrier {
        Carrier {
            id: 1,
            license_plate: "ABC123".to_string(),
            max_weight: Some(max_weight),
            max_volume: Some(max_volume),
            cost_per_km: Some(dec!(10.00)),
            avg_fuel_consumption: Some(dec!(0.2)),
            available: true,
            active: true,
        }
    }

    fn container() -> Container {
        Container {
            id: 1,
            weight: Some(dec!(1000)),
            volume: Some(dec!(10.5)),
        }
    }

    fn selected_route() -> Route {
        let mut route = Route::new(1, 1, Utc::now());
        select_option(&mut route, &option(2), dec!(8.00), &mut IdSequence::starting_at(100)).unwrap();
        route
    }

    #[test]
    fn test_select_copies_segments_with_fresh_ids() {
        let opt = option(2);
        let route = selected_route();
        assert_eq!(route.selected_option_id, Some(2));
        assert_eq!(route.segments.len(), 2);
        assert_eq!(route.segments[0].id, 100);
        assert_eq!(route.segments[1].id, 101);
        assert_eq!(route.segments[0].approximate_cost, Some(dec!(1120.00)));
        // la opción conserva su copia original
        assert_eq!(opt.segments[0].approximate_cost, Some(dec!(1)));
    }

    #[test]
    fn test_reselect_same_option_is_noop() {
        let mut route = selected_route();
        let before = route.segments.clone();
        select_option(&mut route, &option(2), dec!(8.00), &mut IdSequence::starting_at(500)).unwrap();
        assert_eq!(route.segments, before);
    }

    #[test]
    fn test_reselect_other_option_conflicts() {
        let mut route = selected_route();
        let err = select_option(&mut route, &option(9), dec!(8.00), &mut IdSequence::default()).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_assign_carrier_success() {
        let mut route = selected_route();
        assign_carrier(&mut route, &carrier(dec!(20000), dec!(50)), Some(&container()), 1).unwrap();
        assert!(route
            .segments
            .iter()
            .all(|s| s.carrier_plate.as_deref() == Some("ABC123")));
    }

    #[test]
    fn test_assign_carrier_weight_exceeded() {
        let mut route = selected_route();
        let err = assign_carrier(&mut route, &carrier(dec!(500), dec!(50)), Some(&container()), 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::CapacityExceeded { dimension: CapacityDimension::Weight, .. }
        ));
        assert!(route.segments.iter().all(|s| s.carrier_plate.is_none()));
    }

    #[test]
    fn test_assign_carrier_volume_exceeded() {
        let mut route = selected_route();
        let err = assign_carrier(&mut route, &carrier(dec!(20000), dec!(10)), Some(&container()), 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::CapacityExceeded { dimension: CapacityDimension::Volume, .. }
        ));
    }

    #[test]
    fn test_assign_carrier_missing_container() {
        let mut route = selected_route();
        let err = assign_carrier(&mut route, &carrier(dec!(20000), dec!(50)), None, 7).unwrap_err();
        assert!(matches!(err, AppError::MissingContainer { request_id: 7 }));
    }

    #[test]
    fn test_assign_unavailable_carrier() {
        let mut route = selected_route();
        let mut truck = carrier(dec!(20000), dec!(50));
        truck.available = false;
        let err = assign_carrier(&mut route, &truck, Some(&container()), 1).unwrap_err();
        assert!(matches!(err, AppError::CarrierUnavailable(_)));
    }

    #[test]
    fn test_exact_capacity_fits() {
        let exact = carrier(dec!(1000), dec!(10.5));
        assert!(check_capacity(&container(), &exact).is_ok());
    }
}
