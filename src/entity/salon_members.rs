use sea_orm::entity::prelude::*;

/// Membership of a manager or staff member in a salon.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salon_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub staff_id: Uuid,
    pub salon_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id"
    )]
    Staff,
    #[sea_orm(
        belongs_to = "super::salons::Entity",
        from = "Column::SalonId",
        to = "super::salons::Column::Id"
    )]
    Salons,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<super::salons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
