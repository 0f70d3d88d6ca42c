use sea_orm::entity::prelude::*;

/// Organization owners. Managers and staff live in `staff`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::salons::Entity")]
    Salons,
}

impl Related<super::salons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
