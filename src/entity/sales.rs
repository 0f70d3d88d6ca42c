use sea_orm::entity::prelude::*;

use super::enums::{PaymentMethod, SaleStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub total_ca: i64,
    pub total_products: i64,
    pub tip_amount: i64,
    pub paid_amount: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::salons::Entity",
        from = "Column::SalonId",
        to = "super::salons::Column::Id"
    )]
    Salons,
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
}

impl Related<super::salons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salons.def()
    }
}

impl Related<super::sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
