use sea_orm::entity::prelude::*;

use super::enums::{Role, StaffStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: StaffStatus,
    pub is_bookable: bool,
    pub can_view_own_schedule: bool,
    pub restrict_to_current_day: bool,
    pub password_hash: Option<String>,
    /// Argon2 hash of the pending invitation token, cleared once accepted.
    pub invitation_token_hash: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::salon_members::Entity")]
    SalonMembers,
}

impl Related<super::salon_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalonMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
