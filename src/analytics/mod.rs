//! Pure analytics over already-fetched sales and schedules.
//!
//! Nothing here touches storage. Callers fetch rows through the gateway
//! services and hand them over together with the caller's [`Scope`]; the
//! staff filter is applied again here so a report can never leak another
//! collaborator's sales.

pub mod attendance;
pub mod export;
pub mod revenue;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::ItemType,
    error::{AppError, AppResult},
    models::{Sale, SaleItem},
    scope::Scope,
};

pub use attendance::{AttendanceRow, attendance_report, is_tagged_present, scheduled_presence};
pub use export::attendance_csv;
pub use revenue::{
    DailyRevenue, DashboardReport, ItemMix, ItemStat, RevenueRollup, RevenueTotals,
    SalonPerformance, StaffTips, average_ticket, build_dashboard, item_mix, revenue_rollup,
    tip_distribution,
};

/// Longest range a report may cover, in days.
pub const MAX_RANGE_DAYS: i64 = 3 * 366;

/// Inclusive calendar range, in UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(AppError::validation("start date must not be after end date"));
        }
        let range = Self { start, end };
        if range.inclusive_day_count() > MAX_RANGE_DAYS {
            return Err(AppError::validation(format!(
                "date range must not exceed {MAX_RANGE_DAYS} days"
            )));
        }
        Ok(range)
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn inclusive_day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let count = self.inclusive_day_count().max(0) as usize;
        self.start.iter_days().take(count)
    }

    /// Half-open instant bounds `[start 00:00, end + 1 day 00:00)` for storage queries.
    pub fn utc_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = self.start.and_time(NaiveTime::MIN).and_utc();
        let until = self
            .end
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc();
        (from, until)
    }
}

/// Upper bound for a catalog price or a tip, in cents (1 000 000.00).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;

/// Rejects negative amounts and amounts above [`MAX_AMOUNT_CENTS`].
pub fn validate_amount(field: &str, cents: i64) -> AppResult<i64> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(AppError::validation(format!(
            "{field} must be between 0 and {MAX_AMOUNT_CENTS} cents"
        )));
    }
    Ok(cents)
}

/// `unit_price * qty`, or `None` on overflow.
pub fn line_total(unit_price: i64, qty: i32) -> Option<i64> {
    unit_price.checked_mul(i64::from(qty))
}

/// Service and product revenue derived from sale lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleTotals {
    pub total_ca: i64,
    pub total_products: i64,
}

impl SaleTotals {
    /// Sums the lines per type. `None` if a total overflows.
    pub fn from_items(items: &[SaleItem]) -> Option<Self> {
        items.iter().try_fold(Self::default(), |mut acc, item| {
            match item.item_type {
                ItemType::Service => acc.total_ca = acc.total_ca.checked_add(item.line_total)?,
                ItemType::Product => {
                    acc.total_products = acc.total_products.checked_add(item.line_total)?
                }
            }
            Some(acc)
        })
    }

    /// What the client pays: both revenues plus the tip.
    pub fn paid_with_tip(&self, tip_amount: i64) -> Option<i64> {
        self.total_ca
            .checked_add(self.total_products)?
            .checked_add(tip_amount)
    }
}

/// Valid sales inside `range` and inside the salons the scope resolves for
/// `salon_filter`, narrowed to the principal's own sales for staff.
pub fn visible_sales<'a>(
    scope: &Scope,
    sales: &'a [Sale],
    range: &DateRange,
    salon_filter: Option<Uuid>,
) -> Vec<&'a Sale> {
    let salons = scope.resolve_salons(salon_filter);
    let staff_filter = scope.staff_filter();
    sales
        .iter()
        .filter(|sale| sale.is_valid())
        .filter(|sale| range.contains(sale.day()))
        .filter(|sale| salons.contains(&sale.salon_id))
        .filter(|sale| staff_filter.is_none_or(|own| sale.staff_id == own))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use crate::{
        entity::enums::{ItemType, PaymentMethod, SaleStatus},
        models::{Sale, SaleItem},
    };

    pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn line(item_type: ItemType, name: &str, unit_price: i64, qty: i32) -> SaleItem {
        SaleItem {
            item_type,
            ref_id: Uuid::from_u128(
                name.bytes()
                    .fold(7u128, |acc, b| acc.wrapping_mul(31).wrapping_add(u128::from(b))),
            ),
            name: name.to_string(),
            unit_price,
            qty,
            line_total: unit_price * i64::from(qty),
        }
    }

    pub fn sale(
        salon_id: Uuid,
        staff_id: Uuid,
        on: NaiveDate,
        items: Vec<SaleItem>,
        tip_amount: i64,
    ) -> Sale {
        let totals = super::SaleTotals::from_items(&items).unwrap();
        Sale {
            id: Uuid::new_v4(),
            salon_id,
            staff_id,
            staff_name: format!("staff-{}", &staff_id.to_string()[..4]),
            items,
            total_ca: totals.total_ca,
            total_products: totals.total_products,
            tip_amount,
            paid_amount: totals.total_ca + totals.total_products + tip_amount,
            payment_method: PaymentMethod::Card,
            status: SaleStatus::Valid,
            cancel_reason: None,
            created_at: Utc
                .from_utc_datetime(&on.and_hms_opt(10, 30, 0).unwrap()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::fixtures::{day, line, sale};
    use super::*;
    use crate::entity::enums::{Role, SaleStatus};

    fn scope(role: Role, salons: &[Uuid]) -> Scope {
        Scope {
            principal_id: Uuid::new_v4(),
            role,
            organization_owner_id: Some(Uuid::new_v4()),
            accessible_salon_ids: salons.iter().copied().collect::<BTreeSet<_>>(),
            can_view_own_schedule: true,
            restrict_to_current_day: false,
        }
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            DateRange::new(day(2025, 3, 2), day(2025, 3, 1)),
            Err(AppError::ValidationFailed(_))
        ));
        let range = DateRange::new(day(2025, 2, 27), day(2025, 3, 2)).unwrap();
        assert_eq!(range.inclusive_day_count(), 4);
        assert_eq!(range.days().count(), 4);
        assert_eq!(DateRange::single(day(2025, 3, 1)).inclusive_day_count(), 1);
    }

    #[test]
    fn utc_bounds_cover_the_whole_last_day() {
        let range = DateRange::new(day(2025, 1, 1), day(2025, 1, 31)).unwrap();
        let (from, until) = range.utc_bounds();
        assert_eq!(from.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(until.to_rfc3339(), "2025-02-01T00:00:00+00:00");
    }

    #[test]
    fn sale_totals_split_services_and_products() {
        let items = vec![
            line(ItemType::Service, "Cut", 3500, 1),
            line(ItemType::Product, "Shampoo", 1200, 2),
            line(ItemType::Service, "Color", 4000, 1),
        ];
        let totals = SaleTotals::from_items(&items).unwrap();
        assert_eq!(totals.total_ca, 7500);
        assert_eq!(totals.total_products, 2400);
        assert_eq!(totals.paid_with_tip(500), Some(10_400));
        assert_eq!(SaleTotals::from_items(&[]), Some(SaleTotals::default()));
    }

    #[test]
    fn ranges_are_bounded() {
        assert!(DateRange::new(day(2025, 1, 2), day(2025, 1, 1)).is_err());
        assert!(matches!(
            DateRange::new(NaiveDate::MIN, NaiveDate::MAX),
            Err(AppError::ValidationFailed(_))
        ));

        let start = day(2024, 1, 1);
        let last = start + Days::new(MAX_RANGE_DAYS as u64 - 1);
        let widest = DateRange::new(start, last).unwrap();
        assert_eq!(widest.inclusive_day_count(), MAX_RANGE_DAYS);
        assert!(DateRange::new(start, last + Days::new(1)).is_err());
    }

    #[test]
    fn money_arithmetic_reports_overflow() {
        assert_eq!(line_total(MAX_AMOUNT_CENTS, i32::MAX), Some(MAX_AMOUNT_CENTS * i64::from(i32::MAX)));
        assert_eq!(line_total(i64::MAX, 2), None);

        let items = vec![
            line(ItemType::Service, "Cut", i64::MAX, 1),
            line(ItemType::Service, "Color", 1, 1),
        ];
        assert_eq!(SaleTotals::from_items(&items), None);

        let totals = SaleTotals {
            total_ca: 3000,
            total_products: 0,
        };
        assert_eq!(totals.paid_with_tip(i64::MAX), None);

        assert!(validate_amount("tip", MAX_AMOUNT_CENTS).is_ok());
        assert!(validate_amount("tip", MAX_AMOUNT_CENTS + 1).is_err());
        assert!(validate_amount("price", -1).is_err());
    }

    #[test]
    fn staff_only_ever_see_their_own_valid_sales() {
        let salon = Uuid::new_v4();
        let staff_scope = scope(Role::Staff, &[salon]);
        let other = Uuid::new_v4();
        let d = day(2025, 5, 10);
        let mut cancelled = sale(salon, staff_scope.principal_id, d, vec![], 0);
        cancelled.status = SaleStatus::Cancelled;
        let sales = vec![
            sale(salon, staff_scope.principal_id, d, vec![], 100),
            sale(salon, other, d, vec![], 200),
            cancelled,
        ];

        let range = DateRange::single(d);
        let visible = visible_sales(&staff_scope, &sales, &range, None);
        assert_eq!(visible.len(), 1);
        assert!(visible.iter().all(|s| s.staff_id == staff_scope.principal_id));

        let manager = scope(Role::Manager, &[salon]);
        assert_eq!(visible_sales(&manager, &sales, &range, None).len(), 2);
    }

    #[test]
    fn salon_filter_outside_scope_yields_nothing() {
        let salon = Uuid::new_v4();
        let foreign = Uuid::new_v4();
        let owner = scope(Role::Owner, &[salon]);
        let d = day(2025, 5, 10);
        let sales = vec![sale(foreign, Uuid::new_v4(), d, vec![], 0)];
        let range = DateRange::single(d);
        assert!(visible_sales(&owner, &sales, &range, None).is_empty());
        assert!(visible_sales(&owner, &sales, &range, Some(foreign)).is_empty());
    }
}
