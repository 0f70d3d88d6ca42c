use sea_orm::entity::prelude::*;

use super::enums::AppointmentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salon_id: Uuid,
    /// `None` when the client asked for any available collaborator.
    pub staff_id: Option<Uuid>,
    pub staff_name: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub start_time: DateTimeWithTimeZone,
    pub duration: i32,
    pub status: AppointmentStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
