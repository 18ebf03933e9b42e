//! Costeo de tramos
//!
//! Costo aproximado (planificación) y costo real (liquidación) de un tramo.
//! Funciones puras: un dato faltante anula solo su componente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::carrier::Carrier;
use crate::models::deposit::DepositRegistry;
use crate::models::fare::FareTable;
use crate::models::segment::Segment;
use crate::utils::money::round_money;

/// Costo aproximado = distancia × tarifa base por km, redondeado al centavo
pub fn approximate_cost(segment: &Segment, base_rate_per_km: Decimal) -> Decimal {
    round_money(segment.distance_or_zero() * base_rate_per_km)
}

/// Desglose del costo real de un tramo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RealCostBreakdown {
    pub carrier_rate: Decimal,
    pub fuel: Decimal,
    pub layover: Decimal,
    pub layover_nights: i64,
}

impl RealCostBreakdown {
    /// Suma de componentes, redondeada al centavo
    pub fn total(&self) -> Decimal {
        round_money(self.carrier_rate + self.fuel + self.layover)
    }
}

/// Costo real de un tramo
pub fn real_cost(
    segment: &Segment,
    carrier: Option<&Carrier>,
    fare_table: &FareTable,
    deposits: &DepositRegistry,
    route_segments: &[Segment],
) -> Decimal {
    real_cost_breakdown(segment, carrier, fare_table, deposits, route_segments).total()
}

/// Costo real con el detalle de cada componente
pub fn real_cost_breakdown(
    segment: &Segment,
    carrier: Option<&Carrier>,
    fare_table: &FareTable,
    deposits: &DepositRegistry,
    route_segments: &[Segment],
) -> RealCostBreakdown {
    let distance = segment.distance_or_zero();

    let carrier_rate = carrier
        .and_then(|c| c.cost_per_km)
        .map(|rate| rate * distance)
        .unwrap_or(Decimal::ZERO);

    let fuel = carrier
        .and_then(|c| c.avg_fuel_consumption)
        .map(|consumption| consumption * distance * fare_table.fuel_price)
        .unwrap_or(Decimal::ZERO);

    let (layover, layover_nights) = match layover_inputs(segment, deposits, route_segments) {
        Some((fee, end, next_start)) => {
            let nights = layover_nights(end, next_start);
            (fee * Decimal::from(nights), nights)
        }
        None => (Decimal::ZERO, 0),
    };

    RealCostBreakdown {
        carrier_rate,
        fuel,
        layover,
        layover_nights,
    }
}

/// Noches de calendario entre el fin de un tramo y el inicio del siguiente
pub fn layover_nights(end: DateTime<Utc>, next_start: DateTime<Utc>) -> i64 {
    (next_start.date_naive() - end.date_naive()).num_days().max(0)
}

/// Tramo siguiente por índice de orden
pub fn next_segment<'a>(segment: &Segment, route_segments: &'a [Segment]) -> Option<&'a Segment> {
    route_segments
        .iter()
        .filter(|s| s.order > segment.order)
        .min_by_key(|s| s.order)
}

fn layover_inputs(
    segment: &Segment,
    deposits: &DepositRegistry,
    route_segments: &[Segment],
) -> Option<(Decimal, DateTime<Utc>, DateTime<Utc>)> {
    let fee = deposits.nightly_fee(segment.destination_deposit_id)?;
    let next_start = next_segment(segment, route_segments)?.actual_start?;
    let end = segment.actual_end?;
    Some((fee, end, next_start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deposit::Deposit;
    use crate::models::location::Coordinates;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn segment(id: u64, order: u32, from: u64, to: u64, distance: Decimal) -> Segment {
        Segment {
            id,
            order,
            origin_deposit_id: from,
            destination_deposit_id: to,
            origin_latitude: None,
            origin_longitude: None,
            destination_latitude: None,
            destination_longitude: None,
            distance: Some(distance),
            duration: Some(dec!(2)),
            carrier_plate: None,
            approximate_cost: None,
            real_cost: None,
            actual_start: None,
            actual_end: None,
        }
    }

    fn carrier() -> Carrier {
        Carrier {
            id: 1,
            license_plate: "ABC123".to_string(),
            max_weight: Some(dec!(20000)),
            max_volume: Some(dec!(50)),
            cost_per_km: Some(dec!(10.00)),
            avg_fuel_consumption: Some(dec!(0.2)),
            available: true,
            active: true,
        }
    }

    fn fare() -> FareTable {
        FareTable {
            id: 1,
            management_fee: dec!(50.00),
            fuel_price: dec!(1.20),
        }
    }

    fn deposits(fee: Option<Decimal>) -> DepositRegistry {
        DepositRegistry::new(vec![Deposit {
            id: 102,
            name: "Depósito Sur".to_string(),
            location: Coordinates::new(dec!(-34.7), dec!(-58.5)),
            nightly_fee: fee,
        }])
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_approximate_cost_rounding() {
        let rate = dec!(8.00);
        assert_eq!(approximate_cost(&segment(1, 1, 101, 102, dec!(12.345)), rate), dec!(98.76));
        assert_eq!(approximate_cost(&segment(1, 1, 101, 102, dec!(12.5)), rate), dec!(100.00));
        // 1.250625 × 8 = 10.005, empate que sube
        assert_eq!(approximate_cost(&segment(1, 1, 101, 102, dec!(1.250625)), rate), dec!(10.01));
    }

    #[test]
    fn test_approximate_cost_without_distance() {
        let mut seg = segment(1, 1, 101, 102, dec!(0));
        seg.distance = None;
        assert_eq!(approximate_cost(&seg, dec!(8.00)), dec!(0));
    }

    #[test]
    fn test_real_cost_components() {
        let seg = segment(1, 1, 101, 102, dec!(140));
        let breakdown = real_cost_breakdown(&seg, Some(&carrier()), &fare(), &deposits(None), &[seg.clone()]);
        assert_eq!(breakdown.carrier_rate, dec!(1400.00));
        // 0.2 × 140 × 1.20
        assert_eq!(breakdown.fuel, dec!(33.600));
        assert_eq!(breakdown.layover, dec!(0));
        assert_eq!(breakdown.total(), dec!(1433.60));
    }

    #[test]
    fn test_carrier_without_rates() {
        let seg = segment(1, 1, 101, 102, dec!(140));
        let mut partial = carrier();
        partial.cost_per_km = None;
        let cost = real_cost(&seg, Some(&partial), &fare(), &deposits(None), &[seg.clone()]);
        assert_eq!(cost, dec!(33.60));
    }

    #[test]
    fn test_layover_two_nights() {
        let mut first = segment(1, 1, 101, 102, dec!(100));
        first.actual_end = Some(at(2024, 1, 1, 10));
        let mut second = segment(2, 2, 102, 103, dec!(180));
        second.actual_start = Some(at(2024, 1, 3, 8));
        let route = vec![first.clone(), second];

        let breakdown = real_cost_breakdown(&first, None, &fare(), &deposits(Some(dec!(20.00))), &route);
        assert_eq!(breakdown.layover_nights, 2);
        assert_eq!(breakdown.total(), dec!(40.00));
    }

    #[test]
    fn test_layover_same_day_is_free() {
        let mut first = segment(1, 1, 101, 102, dec!(100));
        first.actual_end = Some(at(2024, 1, 1, 10));
        let mut second = segment(2, 2, 102, 103, dec!(180));
        second.actual_start = Some(at(2024, 1, 1, 23));
        let route = vec![second, first.clone()];

        let cost = real_cost(&first, None, &fare(), &deposits(Some(dec!(20.00))), &route);
        assert_eq!(cost, dec!(0));
    }

    #[test]
    fn test_layover_requires_all_inputs() {
        let mut first = segment(1, 1, 101, 102, dec!(100));
        first.actual_end = Some(at(2024, 1, 1, 10));
        let second = segment(2, 2, 102, 103, dec!(180));
        let route = vec![first.clone(), second];

        // siguiente tramo sin inicio registrado
        assert_eq!(real_cost(&first, None, &fare(), &deposits(Some(dec!(20.00))), &route), dec!(0));
        // depósito sin tarifa nocturna
        assert_eq!(real_cost(&first, None, &fare(), &deposits(None), &route), dec!(0));
        // último tramo de la ruta
        assert_eq!(real_cost(&route[1], None, &fare(), &deposits(Some(dec!(20.00))), &route), dec!(0));
    }

    #[test]
    fn test_no_carrier_means_layover_only() {
        let mut first = segment(1, 1, 101, 102, dec!(250));
        first.actual_end = Some(at(2024, 3, 10, 22));
        let mut second = segment(2, 2, 102, 103, dec!(90));
        second.actual_start = Some(at(2024, 3, 11, 2));
        let route = vec![first.clone(), second];

        let breakdown = real_cost_breakdown(&first, None, &fare(), &deposits(Some(dec!(20.00))), &route);
        assert_eq!(breakdown.carrier_rate, dec!(0));
        assert_eq!(breakdown.fuel, dec!(0));
        assert_eq!(breakdown.total(), breakdown.layover);
        assert_eq!(breakdown.total(), dec!(20.00));
    }

    #[test]
    fn test_next_segment_uses_order_not_position() {
        let route = vec![
            segment(7, 3, 103, 104, dec!(1)),
            segment(5, 1, 101, 102, dec!(1)),
            segment(6, 2, 102, 103, dec!(1)),
        ];
        assert_eq!(next_segment(&route[1], &route).map(|s| s.id), Some(6));
        assert_eq!(next_segment(&route[2], &route).map(|s| s.id), Some(7));
        assert!(next_segment(&route[0], &route).is_none());
    }
}
