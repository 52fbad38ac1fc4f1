use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the users table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            hashed_password: model.hashed_password,
            is_active: model.is_active,
            is_admin: model.is_admin,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// ActiveModel for inserting a new user; the id is left for the database.
pub fn insert_model(user: &crate::models::User) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        email: Set(user.email.clone()),
        full_name: Set(user.full_name.clone()),
        hashed_password: Set(user.hashed_password.clone()),
        is_active: Set(user.is_active),
        is_admin: Set(user.is_admin),
        created_at: Set(user.created_at.into()),
        updated_at: Set(user.updated_at.map(Into::into)),
    }
}

/// ActiveModel carrying every column for an update by primary key.
pub fn update_model(user: &crate::models::User) -> ActiveModel {
    ActiveModel {
        id: Set(user.id),
        email: Set(user.email.clone()),
        full_name: Set(user.full_name.clone()),
        hashed_password: Set(user.hashed_password.clone()),
        is_active: Set(user.is_active),
        is_admin: Set(user.is_admin),
        created_at: Set(user.created_at.into()),
        updated_at: Set(user.updated_at.map(Into::into)),
    }
}
