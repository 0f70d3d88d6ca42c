use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{DateRange, visible_sales};
use crate::{
    entity::enums::ItemType,
    models::{Sale, Salon},
    scope::Scope,
};

pub const DEFAULT_TOP_ITEMS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RevenueTotals {
    pub total_ca: i64,
    pub total_products: i64,
    pub total_tips: i64,
    pub sale_count: u32,
}

impl RevenueTotals {
    fn add(&mut self, sale: &Sale) {
        self.total_ca += sale.total_ca;
        self.total_products += sale.total_products;
        self.total_tips += sale.tip_amount;
        self.sale_count += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub totals: RevenueTotals,
    /// Same sums split by salon id.
    #[schema(value_type = Object)]
    pub per_salon: BTreeMap<Uuid, RevenueTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalonPerformance {
    pub salon_id: Uuid,
    pub name: String,
    pub totals: RevenueTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RevenueRollup {
    pub totals: RevenueTotals,
    pub daily: Vec<DailyRevenue>,
    pub per_salon: Vec<SalonPerformance>,
}

/// Consolidated daily series plus a per-salon breakdown. Every day of the
/// range and every salon in `salons` appear, even without sales.
pub fn revenue_rollup(sales: &[&Sale], range: &DateRange, salons: &[Salon]) -> RevenueRollup {
    let mut daily: BTreeMap<NaiveDate, DailyRevenue> = range
        .days()
        .map(|date| {
            let per_salon = salons
                .iter()
                .map(|salon| (salon.id, RevenueTotals::default()))
                .collect();
            (
                date,
                DailyRevenue {
                    date,
                    totals: RevenueTotals::default(),
                    per_salon,
                },
            )
        })
        .collect();
    let mut per_salon: BTreeMap<Uuid, RevenueTotals> = salons
        .iter()
        .map(|salon| (salon.id, RevenueTotals::default()))
        .collect();
    let mut totals = RevenueTotals::default();

    for sale in sales.iter().filter(|sale| sale.is_valid()) {
        let Some(day) = daily.get_mut(&sale.day()) else {
            continue;
        };
        day.totals.add(sale);
        day.per_salon.entry(sale.salon_id).or_default().add(sale);
        per_salon.entry(sale.salon_id).or_default().add(sale);
        totals.add(sale);
    }

    let names: BTreeMap<Uuid, &str> = salons.iter().map(|s| (s.id, s.name.as_str())).collect();
    let mut per_salon: Vec<SalonPerformance> = per_salon
        .into_iter()
        .map(|(salon_id, totals)| SalonPerformance {
            salon_id,
            name: names.get(&salon_id).copied().unwrap_or_default().to_string(),
            totals,
        })
        .collect();
    per_salon.sort_by(|a, b| {
        b.totals
            .total_ca
            .cmp(&a.totals.total_ca)
            .then_with(|| a.name.cmp(&b.name))
    });

    RevenueRollup {
        totals,
        daily: daily.into_values().collect(),
        per_salon,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ItemStat {
    pub ref_id: Uuid,
    pub name: String,
    pub item_type: ItemType,
    pub qty: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ItemMix {
    pub services_total: i64,
    pub products_total: i64,
    pub top_items: Vec<ItemStat>,
}

/// Service vs product line totals and the `top_n` items by quantity sold.
pub fn item_mix(sales: &[&Sale], top_n: usize) -> ItemMix {
    let mut services_total = 0;
    let mut products_total = 0;
    let mut items: BTreeMap<Uuid, ItemStat> = BTreeMap::new();

    for item in sales
        .iter()
        .filter(|sale| sale.is_valid())
        .flat_map(|sale| sale.items.iter())
    {
        match item.item_type {
            ItemType::Service => services_total += item.line_total,
            ItemType::Product => products_total += item.line_total,
        }
        let stat = items.entry(item.ref_id).or_insert_with(|| ItemStat {
            ref_id: item.ref_id,
            name: item.name.clone(),
            item_type: item.item_type,
            qty: 0,
            revenue: 0,
        });
        stat.qty += i64::from(item.qty);
        stat.revenue += item.line_total;
    }

    let mut top_items: Vec<ItemStat> = items.into_values().collect();
    top_items.sort_by(|a, b| {
        b.qty
            .cmp(&a.qty)
            .then_with(|| b.revenue.cmp(&a.revenue))
            .then_with(|| a.name.cmp(&b.name))
    });
    top_items.truncate(top_n);

    ItemMix {
        services_total,
        products_total,
        top_items,
    }
}

/// Service revenue per valid sale, in cents. Zero without sales.
pub fn average_ticket(sales: &[&Sale]) -> i64 {
    let (total, count) = sales
        .iter()
        .filter(|sale| sale.is_valid())
        .fold((0i64, 0i64), |(total, count), sale| (total + sale.total_ca, count + 1));
    if count == 0 { 0 } else { total / count }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StaffTips {
    pub staff_id: Uuid,
    pub staff_name: String,
    pub total_tips: i64,
}

/// Tips grouped by collaborator, highest first; collaborators without tips are left out.
pub fn tip_distribution(sales: &[&Sale]) -> Vec<StaffTips> {
    let mut by_staff: BTreeMap<Uuid, StaffTips> = BTreeMap::new();
    for sale in sales.iter().filter(|sale| sale.is_valid()) {
        by_staff
            .entry(sale.staff_id)
            .or_insert_with(|| StaffTips {
                staff_id: sale.staff_id,
                staff_name: sale.staff_name.clone(),
                total_tips: 0,
            })
            .total_tips += sale.tip_amount;
    }
    let mut tips: Vec<StaffTips> = by_staff
        .into_values()
        .filter(|entry| entry.total_tips > 0)
        .collect();
    tips.sort_by(|a, b| {
        b.total_tips
            .cmp(&a.total_tips)
            .then_with(|| a.staff_name.cmp(&b.staff_name))
    });
    tips
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardReport {
    pub range: DateRange,
    pub salon_ids: Vec<Uuid>,
    pub totals: RevenueTotals,
    pub daily: Vec<DailyRevenue>,
    pub per_salon: Vec<SalonPerformance>,
    pub item_mix: ItemMix,
    pub tip_distribution: Vec<StaffTips>,
    pub average_ticket: i64,
    pub active_days: u32,
    pub active_staff: Vec<String>,
}

pub fn build_dashboard(
    scope: &Scope,
    sales: &[Sale],
    salons: &[Salon],
    range: &DateRange,
    salon_filter: Option<Uuid>,
    top_n: usize,
) -> DashboardReport {
    let salon_ids = scope.resolve_salons(salon_filter);
    let salons: Vec<Salon> = salons
        .iter()
        .filter(|salon| salon_ids.contains(&salon.id))
        .cloned()
        .collect();
    let visible = visible_sales(scope, sales, range, salon_filter);
    let rollup = revenue_rollup(&visible, range, &salons);

    let active_days = visible
        .iter()
        .map(|sale| sale.day())
        .collect::<BTreeSet<_>>()
        .len() as u32;
    let active_staff = visible
        .iter()
        .map(|sale| sale.staff_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    DashboardReport {
        range: *range,
        salon_ids,
        totals: rollup.totals,
        daily: rollup.daily,
        per_salon: rollup.per_salon,
        item_mix: item_mix(&visible, top_n),
        tip_distribution: tip_distribution(&visible),
        average_ticket: average_ticket(&visible),
        active_days,
        active_staff,
    }
}
