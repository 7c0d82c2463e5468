//! Dashboard and per-kandang aggregates.
//!
//! Everything here is a pure function of its inputs and is recomputed from
//! a snapshot on each request.

use serde::Serialize;

use crate::entities::breeding_record;
use crate::entities::kandang;
use crate::entities::livestock::{self, LivestockStatus};
use crate::entities::sale::{self, DeliveryStatus, PaymentStatus};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_livestock: usize,
    pub healthy_count: usize,
    pub sick_count: usize,
    pub quarantine_count: usize,
    pub deceased_count: usize,
    pub active_breeding: usize,
    pub pending_sales: usize,
    pub total_revenue: f64,
    pub pending_revenue: f64,
    pub average_weight: f64,
    pub total_kandang: usize,
}

/// Mean weight, or 0 for an empty herd.
pub fn average_weight<'a>(herd: impl IntoIterator<Item = &'a livestock::Model>) -> f64 {
    let (sum, count) = herd
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), animal| (sum + animal.weight, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Sum of prices over fully paid sales.
pub fn total_revenue(sales: &[sale::Model]) -> f64 {
    sales
        .iter()
        .filter(|s| s.payment_status == PaymentStatus::Completed)
        .map(|s| s.price)
        .sum()
}

/// Sum of prices still owed (`pending` or `partial`).
pub fn pending_revenue(sales: &[sale::Model]) -> f64 {
    sales
        .iter()
        .filter(|s| s.payment_status.is_outstanding())
        .map(|s| s.price)
        .sum()
}

fn count_status(herd: &[livestock::Model], status: LivestockStatus) -> usize {
    herd.iter().filter(|a| a.status == status).count()
}

pub fn dashboard(
    herd: &[livestock::Model],
    sales: &[sale::Model],
    breeding: &[breeding_record::Model],
    pens: &[kandang::Model],
) -> DashboardStats {
    DashboardStats {
        total_livestock: herd.len(),
        healthy_count: count_status(herd, LivestockStatus::Healthy),
        sick_count: count_status(herd, LivestockStatus::Sick),
        quarantine_count: count_status(herd, LivestockStatus::Quarantine),
        deceased_count: count_status(herd, LivestockStatus::Deceased),
        active_breeding: breeding.iter().filter(|b| b.status.is_active()).count(),
        pending_sales: sales
            .iter()
            .filter(|s| s.delivery_status != DeliveryStatus::Delivered)
            .count(),
        total_revenue: total_revenue(sales),
        pending_revenue: pending_revenue(sales),
        average_weight: average_weight(herd),
        total_kandang: pens.len(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KandangStats {
    pub kandang_id: i32,
    pub name: String,
    pub capacity: i32,
    pub occupancy: usize,
    pub available: usize,
    /// Occupancy over capacity; may exceed 1 when a kandang is overfilled.
    pub occupancy_rate: f64,
    pub healthy_count: usize,
    pub sick_count: usize,
    pub quarantine_count: usize,
    pub average_weight: f64,
}

pub fn kandang_stats(pen: &kandang::Model, herd: &[livestock::Model]) -> KandangStats {
    let occupants = pen.name_ref().occupants(herd);
    let occupancy = occupants.len();
    let capacity = usize::try_from(pen.capacity).unwrap_or(0);
    let count = |status: LivestockStatus| occupants.iter().filter(|a| a.status == status).count();

    KandangStats {
        kandang_id: pen.id,
        name: pen.name.clone(),
        capacity: pen.capacity,
        occupancy,
        available: capacity.saturating_sub(occupancy),
        occupancy_rate: if capacity == 0 {
            0.0
        } else {
            occupancy as f64 / capacity as f64
        },
        healthy_count: count(LivestockStatus::Healthy),
        sick_count: count(LivestockStatus::Sick),
        quarantine_count: count(LivestockStatus::Quarantine),
        average_weight: average_weight(occupants.iter().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::breeding_record::BreedingStatus;
    use crate::reference::tests::{animal, pen};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sale(id: i32, price: f64, payment: PaymentStatus, delivery: DeliveryStatus) -> sale::Model {
        let at = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        sale::Model {
            id,
            livestock_id: id,
            buyer_name: "Pak Budi".to_string(),
            buyer_contact: "0812".to_string(),
            price,
            sale_date: at,
            payment_status: payment,
            delivery_status: delivery,
            notes: None,
            created_at: at.and_hms_opt(0, 0, 0).unwrap(),
            updated_at: at.and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn breeding(id: i32, status: BreedingStatus) -> breeding_record::Model {
        let at = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        breeding_record::Model {
            id,
            mother_id: 1,
            father_id: None,
            breeding_date: at,
            expected_delivery_date: at,
            actual_delivery_date: None,
            status,
            number_of_offspring: None,
            notes: None,
            created_at: at.and_hms_opt(0, 0, 0).unwrap(),
            updated_at: at.and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn herd_counts_and_average_weight() {
        let herd = vec![
            animal(1, "A", LivestockStatus::Healthy, 400.0),
            animal(2, "A", LivestockStatus::Sick, 300.0),
            animal(3, "A", LivestockStatus::Healthy, 500.0),
        ];
        let stats = dashboard(&herd, &[], &[], &[]);
        assert_eq!(stats.healthy_count, 2);
        assert_eq!(stats.sick_count, 1);
        assert_eq!(stats.average_weight, 400.0);
    }

    #[test]
    fn named_buckets_never_exceed_herd() {
        let herd = vec![
            animal(1, "A", LivestockStatus::Healthy, 1.0),
            animal(2, "A", LivestockStatus::Quarantine, 1.0),
            animal(3, "A", LivestockStatus::Sold, 1.0),
            animal(4, "A", LivestockStatus::Deceased, 1.0),
        ];
        let stats = dashboard(&herd, &[], &[], &[]);
        assert!(stats.healthy_count + stats.sick_count + stats.deceased_count <= herd.len());
        assert_eq!(stats.total_livestock, 4);
    }

    #[test]
    fn empty_herd_averages_zero() {
        let stats = dashboard(&[], &[], &[], &[]);
        assert_eq!(stats.average_weight, 0.0);
        assert!(!stats.average_weight.is_nan());
    }

    #[test]
    fn revenue_splits_by_payment_status() {
        let sales = vec![
            sale(1, 1000.0, PaymentStatus::Completed, DeliveryStatus::Delivered),
            sale(2, 500.0, PaymentStatus::Pending, DeliveryStatus::Pending),
        ];
        let stats = dashboard(&[], &sales, &[], &[]);
        assert_eq!(stats.total_revenue, 1000.0);
        assert_eq!(stats.pending_revenue, 500.0);
        assert_eq!(stats.pending_sales, 1);
        // Same snapshot, same answer.
        assert_eq!(total_revenue(&sales), total_revenue(&sales));
    }

    #[test]
    fn cancelled_sales_earn_nothing() {
        let sales = vec![
            sale(1, 700.0, PaymentStatus::Cancelled, DeliveryStatus::Pending),
            sale(2, 300.0, PaymentStatus::Partial, DeliveryStatus::InTransit),
        ];
        assert_eq!(total_revenue(&sales), 0.0);
        assert_eq!(pending_revenue(&sales), 300.0);
    }

    #[test]
    fn active_breeding_counts_planned_and_pregnant() {
        let records = vec![
            breeding(1, BreedingStatus::Planned),
            breeding(2, BreedingStatus::Pregnant),
            breeding(3, BreedingStatus::Delivered),
            breeding(4, BreedingStatus::Failed),
        ];
        assert_eq!(dashboard(&[], &[], &records, &[]).active_breeding, 2);
    }

    #[test]
    fn kandang_occupancy_by_name() {
        let herd = vec![
            animal(1, "Kandang A", LivestockStatus::Healthy, 300.0),
            animal(2, "Kandang A", LivestockStatus::Sick, 200.0),
            animal(3, "Kandang B", LivestockStatus::Healthy, 900.0),
        ];
        let stats = kandang_stats(&pen(1, "Kandang A", 4), &herd);
        assert_eq!(
            stats,
            KandangStats {
                kandang_id: 1,
                name: "Kandang A".to_string(),
                capacity: 4,
                occupancy: 2,
                available: 2,
                occupancy_rate: 0.5,
                healthy_count: 1,
                sick_count: 1,
                quarantine_count: 0,
                average_weight: 250.0,
            }
        );
    }

    #[test]
    fn overfilled_kandang_has_no_available_slots() {
        let herd: Vec<_> = (1..=3)
            .map(|id| animal(id, "Tiny", LivestockStatus::Healthy, 10.0))
            .collect();
        let stats = kandang_stats(&pen(1, "Tiny", 2), &herd);
        assert_eq!(stats.available, 0);
        assert_eq!(stats.occupancy_rate, 1.5);
    }
}
