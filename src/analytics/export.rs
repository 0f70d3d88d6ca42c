//! Attendance CSV: `;`-separated, UTF-8 with a byte order mark so spreadsheet
//! tools pick the right encoding.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::{AttendanceRow, DateRange};
use crate::models::Salon;

const BOM: char = '\u{FEFF}';
const SEPARATOR: char = ';';

pub fn attendance_csv(
    rows: &[AttendanceRow],
    salons: &[Salon],
    range: &DateRange,
    include_tips: bool,
) -> String {
    let names: BTreeMap<Uuid, &str> = salons.iter().map(|s| (s.id, s.name.as_str())).collect();

    let mut header = vec![
        "Collaborator",
        "Role",
        "Salons",
        "Days active",
        "Activity rate %",
        "Revenue",
    ];
    if include_tips {
        header.push("Tips");
    }
    header.extend(["Period start", "Period end"]);

    let mut out = String::new();
    out.push(BOM);
    push_line(&mut out, header.into_iter().map(str::to_string));

    for row in rows {
        let salon_names = row
            .salon_ids
            .iter()
            .filter_map(|id| names.get(id).copied())
            .collect::<Vec<_>>()
            .join(", ");
        let mut fields = vec![
            row.name.clone(),
            row.role.as_str().to_string(),
            salon_names,
            row.days_worked.to_string(),
            format!("{}%", row.activity_rate),
            format_cents(row.total_ca),
        ];
        if include_tips {
            fields.push(format_cents(row.total_tips));
        }
        fields.push(range.start.to_string());
        fields.push(range.end.to_string());
        push_line(&mut out, fields.into_iter());
    }
    out
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line = fields.map(|f| escape(&f)).collect::<Vec<_>>().join(&SEPARATOR.to_string());
    out.push_str(&line);
    out.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains([SEPARATOR, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{analytics::fixtures::day, entity::enums::Role};

    fn row(name: &str, salon_ids: Vec<Uuid>) -> AttendanceRow {
        AttendanceRow {
            staff_id: Uuid::new_v4(),
            name: name.to_string(),
            role: Role::Staff,
            salon_ids,
            days_worked: 3,
            activity_rate: 43,
            is_present_today: false,
            total_ca: 125050,
            total_products: 0,
            total_tips: 1500,
        }
    }

    #[test]
    fn csv_has_bom_and_semicolon_columns() {
        let salon = Salon {
            id: Uuid::new_v4(),
            owner_id: Uuid::nil(),
            name: "Opera".into(),
            address: String::new(),
            total_workstations: 3,
            booking_workstations: 1,
            created_at: Utc::now(),
        };
        let range = DateRange::new(day(2025, 9, 1), day(2025, 9, 7)).unwrap();
        let csv = attendance_csv(&[row("Lea", vec![salon.id])], &[salon], &range, true);

        assert!(csv.starts_with('\u{FEFF}'));
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(
            lines[0],
            "Collaborator;Role;Salons;Days active;Activity rate %;Revenue;Tips;Period start;Period end"
        );
        assert_eq!(lines[1], "Lea;STAFF;Opera;3;43%;1250.50;15.00;2025-09-01;2025-09-07");
    }

    #[test]
    fn tips_column_is_optional_and_fields_are_quoted() {
        let range = DateRange::single(day(2025, 9, 1));
        let csv = attendance_csv(&[row("Doe; Jane", vec![])], &[], &range, false);
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines[0].split(';').count(), 8);
        assert!(lines[1].starts_with("\"Doe; Jane\";STAFF;;3;43%;1250.50;2025-09-01"));
    }

    #[test]
    fn cents_render_with_two_decimals() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-1999), "-19.99");
    }
}
