//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Password, UserRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for UserRecord {
    fn from(model: Model) -> Self {
        UserRecord {
            username: model.username,
            password: Password::from_hash(model.password_hash),
            email: model.email,
            created_at: model.created_at,
        }
    }
}
