use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    appointments, enums::{AppointmentStatus, ItemType, PaymentMethod, Role, SaleStatus, StaffStatus},
    products, sale_items, salons, sales, services, staff_schedules,
};

// Amounts are integer cents throughout.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Salon {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub total_workstations: i32,
    pub booking_workstations: i32,
    pub created_at: DateTime<Utc>,
}

impl From<salons::Model> for Salon {
    fn from(model: salons::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            address: model.address,
            total_workstations: model.total_workstations,
            booking_workstations: model.booking_workstations,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// A member of an organization: the owner profile or a manager/staff row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StaffMember {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: StaffStatus,
    pub salon_ids: Vec<Uuid>,
    pub is_bookable: bool,
    pub can_view_own_schedule: bool,
    pub restrict_to_current_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: i32,
    pub is_active: bool,
}

impl From<services::Model> for Service {
    fn from(model: services::Model) -> Self {
        Self {
            id: model.id,
            salon_id: model.salon_id,
            name: model.name,
            price: model.price,
            duration: model.duration,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub price: i64,
    pub stock_qty: i32,
    pub alert_threshold: i32,
    pub is_critical: bool,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            is_critical: is_critical_stock(model.stock_qty, model.alert_threshold),
            id: model.id,
            salon_id: model.salon_id,
            name: model.name,
            price: model.price,
            stock_qty: model.stock_qty,
            alert_threshold: model.alert_threshold,
        }
    }
}

pub fn is_critical_stock(stock_qty: i32, alert_threshold: i32) -> bool {
    stock_qty <= alert_threshold
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SaleItem {
    pub item_type: ItemType,
    pub ref_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub qty: i32,
    pub line_total: i64,
}

impl From<sale_items::Model> for SaleItem {
    fn from(model: sale_items::Model) -> Self {
        Self {
            item_type: model.item_type,
            ref_id: model.ref_id,
            name: model.name,
            unit_price: model.unit_price,
            qty: model.qty,
            line_total: model.line_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sale {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub items: Vec<SaleItem>,
    pub total_ca: i64,
    pub total_products: i64,
    pub tip_amount: i64,
    pub paid_amount: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    pub fn from_entity(model: sales::Model, items: Vec<SaleItem>) -> Self {
        Self {
            id: model.id,
            salon_id: model.salon_id,
            staff_id: model.staff_id,
            staff_name: model.staff_name,
            items,
            total_ca: model.total_ca,
            total_products: model.total_products,
            tip_amount: model.tip_amount,
            paid_amount: model.paid_amount,
            payment_method: model.payment_method,
            status: model.status,
            cancel_reason: model.cancel_reason,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == SaleStatus::Valid
    }

    pub fn day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Collaborator an appointment is booked with. Serialized as `"any"` or a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffRef {
    Any,
    Staff(Uuid),
}

impl StaffRef {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            StaffRef::Any => None,
            StaffRef::Staff(id) => Some(*id),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, StaffRef::Any)
    }
}

impl From<Option<Uuid>> for StaffRef {
    fn from(value: Option<Uuid>) -> Self {
        value.map_or(StaffRef::Any, StaffRef::Staff)
    }
}

impl Serialize for StaffRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StaffRef::Any => serializer.serialize_str("any"),
            StaffRef::Staff(id) => id.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for StaffRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("any") {
            return Ok(StaffRef::Any);
        }
        Uuid::parse_str(&raw)
            .map(StaffRef::Staff)
            .map_err(serde::de::Error::custom)
    }
}

pub const UNASSIGNED_STAFF_NAME: &str = "Any available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub salon_id: Uuid,
    #[schema(value_type = String, example = "any")]
    pub staff_id: StaffRef,
    pub staff_name: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration: i32,
    pub status: AppointmentStatus,
}

impl From<appointments::Model> for Appointment {
    fn from(model: appointments::Model) -> Self {
        let staff_id = StaffRef::from(model.staff_id);
        let staff_name = if staff_id.is_unassigned() {
            UNASSIGNED_STAFF_NAME.to_string()
        } else {
            model.staff_name
        };
        Self {
            id: model.id,
            salon_id: model.salon_id,
            staff_id,
            staff_name,
            service_id: model.service_id,
            service_name: model.service_name,
            client_name: model.client_name,
            client_phone: model.client_phone,
            client_email: model.client_email,
            start_time: model.start_time.with_timezone(&Utc),
            duration: model.duration,
            status: model.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StaffSchedule {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub date: NaiveDate,
}

impl From<staff_schedules::Model> for StaffSchedule {
    fn from(model: staff_schedules::Model) -> Self {
        Self {
            id: model.id,
            salon_id: model.salon_id,
            staff_id: model.staff_id,
            date: model.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}
