use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: i32,
    pub is_active: bool,
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
}

impl Related<super::salons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
