//! Two presence signals that are not reconciled with each other:
//! [`attendance_report`] infers activity from sales, while
//! [`scheduled_presence`] reads the calendar's presence tags.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::DateRange;
use crate::{
    entity::enums::Role,
    models::{Sale, StaffMember, StaffSchedule},
    scope::Scope,
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceRow {
    pub staff_id: Uuid,
    pub name: String,
    pub role: Role,
    pub salon_ids: Vec<Uuid>,
    pub days_worked: u32,
    /// Percentage of days in the range with at least one valid sale.
    pub activity_rate: u32,
    pub is_present_today: bool,
    pub total_ca: i64,
    pub total_products: i64,
    pub total_tips: i64,
}

#[derive(Default)]
struct Activity {
    days: BTreeSet<NaiveDate>,
    total_ca: i64,
    total_products: i64,
    total_tips: i64,
}

/// Transaction-derived attendance, one row per collaborator the scope may see.
pub fn attendance_report(
    scope: &Scope,
    staff: &[StaffMember],
    sales: &[&Sale],
    range: &DateRange,
    today: NaiveDate,
) -> Vec<AttendanceRow> {
    let mut activity: BTreeMap<Uuid, Activity> = BTreeMap::new();
    for sale in sales
        .iter()
        .filter(|sale| sale.is_valid() && range.contains(sale.day()))
    {
        let entry = activity.entry(sale.staff_id).or_default();
        entry.days.insert(sale.day());
        entry.total_ca += sale.total_ca;
        entry.total_products += sale.total_products;
        entry.total_tips += sale.tip_amount;
    }

    let day_count = range.inclusive_day_count();
    staff
        .iter()
        .filter(|member| scope.can_see_staff_record(Some(member.id)))
        .map(|member| {
            let row = activity.remove(&member.id).unwrap_or_default();
            let days_worked = row.days.len() as u32;
            AttendanceRow {
                staff_id: member.id,
                name: member.name.clone(),
                role: member.role,
                salon_ids: member.salon_ids.clone(),
                days_worked,
                activity_rate: activity_rate(i64::from(days_worked), day_count),
                is_present_today: row.days.contains(&today),
                total_ca: row.total_ca,
                total_products: row.total_products,
                total_tips: row.total_tips,
            }
        })
        .collect()
}

/// `round(days / day_count * 100)`, rounding halves up.
pub fn activity_rate(days_worked: i64, day_count: i64) -> u32 {
    if day_count <= 0 {
        return 0;
    }
    let days = days_worked.clamp(0, day_count);
    ((days * 200 + day_count) / (day_count * 2)) as u32
}

/// Staff tagged present in `salon_id` on `date`.
pub fn scheduled_presence(
    schedules: &[StaffSchedule],
    salon_id: Uuid,
    date: NaiveDate,
) -> BTreeSet<Uuid> {
    schedules
        .iter()
        .filter(|tag| tag.salon_id == salon_id && tag.date == date)
        .map(|tag| tag.staff_id)
        .collect()
}

pub fn is_tagged_present(
    schedules: &[StaffSchedule],
    salon_id: Uuid,
    staff_id: Uuid,
    date: NaiveDate,
) -> bool {
    schedules
        .iter()
        .any(|tag| tag.salon_id == salon_id && tag.staff_id == staff_id && tag.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analytics::{
            fixtures::{day, line, sale},
            visible_sales,
        },
        entity::enums::{ItemType, StaffStatus},
    };

    fn member(id: Uuid, role: Role, salons: &[Uuid]) -> StaffMember {
        StaffMember {
            id,
            owner_id: None,
            email: format!("{id}@salon.test"),
            name: format!("member-{}", &id.to_string()[..4]),
            role,
            status: StaffStatus::Active,
            salon_ids: salons.to_vec(),
            is_bookable: true,
            can_view_own_schedule: true,
            restrict_to_current_day: false,
        }
    }

    fn owner_scope(owner: Uuid, salons: &[Uuid]) -> Scope {
        Scope {
            principal_id: owner,
            role: Role::Owner,
            organization_owner_id: Some(owner),
            accessible_salon_ids: salons.iter().copied().collect(),
            can_view_own_schedule: true,
            restrict_to_current_day: false,
        }
    }

    #[test]
    fn single_day_sale_counts_as_full_activity() {
        let s1 = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let a = Uuid::new_v4();
        let d = day(2025, 6, 2);
        let sales = vec![sale(
            s1,
            a,
            d,
            vec![
                line(ItemType::Service, "Brushing", 5000, 1),
                line(ItemType::Product, "Serum", 2000, 1),
            ],
            1000,
        )];
        let staff = vec![member(owner, Role::Owner, &[s1]), member(a, Role::Staff, &[s1])];
        let scope = owner_scope(owner, &[s1]);
        let range = DateRange::single(d);
        let visible = visible_sales(&scope, &sales, &range, Some(s1));

        let report = attendance_report(&scope, &staff, &visible, &range, d);
        let row = report.iter().find(|r| r.staff_id == a).unwrap();
        assert_eq!(row.days_worked, 1);
        assert_eq!(row.activity_rate, 100);
        assert!(row.is_present_today);
        assert_eq!(row.total_ca, 5000);
        assert_eq!(row.total_products, 2000);
        assert_eq!(row.total_tips, 1000);

        let owner_row = report.iter().find(|r| r.staff_id == owner).unwrap();
        assert_eq!(owner_row.days_worked, 0);
        assert_eq!(owner_row.activity_rate, 0);
    }

    #[test]
    fn activity_rate_stays_within_bounds() {
        for day_count in 1..=40 {
            for days in 0..=day_count {
                let rate = activity_rate(days, day_count);
                assert!(rate <= 100);
            }
            assert_eq!(activity_rate(day_count, day_count), 100);
        }
        assert_eq!(activity_rate(1, 3), 33);
        assert_eq!(activity_rate(2, 3), 67);
        assert_eq!(activity_rate(1, 8), 13);
        assert_eq!(activity_rate(3, 0), 0);
    }

    #[test]
    fn several_sales_on_one_day_count_once() {
        let salon = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let a = Uuid::new_v4();
        let range = DateRange::new(day(2025, 6, 1), day(2025, 6, 4)).unwrap();
        let sales = vec![
            sale(salon, a, day(2025, 6, 1), vec![], 0),
            sale(salon, a, day(2025, 6, 1), vec![], 0),
            sale(salon, a, day(2025, 6, 3), vec![], 0),
            sale(salon, a, day(2025, 6, 9), vec![], 0),
        ];
        let refs: Vec<&Sale> = sales.iter().collect();
        let report = attendance_report(
            &owner_scope(owner, &[salon]),
            &[member(a, Role::Staff, &[salon])],
            &refs,
            &range,
            day(2025, 6, 4),
        );
        assert_eq!(report[0].days_worked, 2);
        assert_eq!(report[0].activity_rate, 50);
        assert!(!report[0].is_present_today);
    }

    #[test]
    fn staff_report_only_contains_the_principal() {
        let salon = Uuid::new_v4();
        let me = Uuid::new_v4();
        let colleague = Uuid::new_v4();
        let scope = Scope {
            role: Role::Staff,
            principal_id: me,
            ..owner_scope(Uuid::new_v4(), &[salon])
        };
        let staff = vec![member(me, Role::Staff, &[salon]), member(colleague, Role::Staff, &[salon])];
        let report = attendance_report(&scope, &staff, &[], &DateRange::single(day(2025, 1, 1)), day(2025, 1, 1));
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].staff_id, me);
    }

    #[test]
    fn schedule_tags_are_independent_of_sales() {
        let salon = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let d = day(2025, 7, 14);
        let schedules = vec![
            StaffSchedule { id: Uuid::new_v4(), salon_id: salon, staff_id: a, date: d },
            StaffSchedule { id: Uuid::new_v4(), salon_id: salon, staff_id: b, date: day(2025, 7, 15) },
            StaffSchedule { id: Uuid::new_v4(), salon_id: Uuid::new_v4(), staff_id: b, date: d },
        ];
        assert_eq!(scheduled_presence(&schedules, salon, d), BTreeSet::from([a]));
        assert!(is_tagged_present(&schedules, salon, a, d));
        assert!(!is_tagged_present(&schedules, salon, b, d));
    }
}
