use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// One JSON document in one named collection.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub collection: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_collection(name: &str) -> Result<(), ModelError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ModelError::Validation(format!("invalid collection name: {name:?}")));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, collection: &str, body: Json) -> Result<Model, ModelError> {
    validate_collection(collection)?;
    if !body.is_object() {
        return Err(ModelError::Validation("document body must be a JSON object".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        collection: Set(collection.to_string()),
        body: Set(body),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// All documents of `collection` whose top-level string fields equal the given values.
pub async fn find_matching(
    db: &DatabaseConnection,
    collection: &str,
    conditions: &[(String, String)],
) -> Result<Vec<Model>, ModelError> {
    let mut finder = Entity::find().filter(Column::Collection.eq(collection));
    for (field, value) in conditions {
        finder = finder.filter(Expr::cust_with_values("body ->> $1 = $2", [field.clone(), value.clone()]));
    }
    Ok(finder.order_by_asc(Column::CreatedAt).all(db).await?)
}

pub async fn find_in_collection(db: &DatabaseConnection, collection: &str, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id)
        .filter(Column::Collection.eq(collection))
        .one(db)
        .await?)
}

/// Shallow-merge `patch` into the stored body; returns whether a row changed.
/// Rows where every patched key already holds an equal value are left untouched.
pub async fn merge_body(db: &DatabaseConnection, collection: &str, id: Uuid, patch: Json) -> Result<bool, ModelError> {
    if !patch.is_object() {
        return Err(ModelError::Validation("patch must be a JSON object".into()));
    }
    let res = Entity::update_many()
        .col_expr(Column::Body, Expr::cust_with_values("body || $1::jsonb", [patch.clone()]))
        .col_expr(Column::UpdatedAt, Expr::value(DateTimeWithTimeZone::from(Utc::now())))
        .filter(Column::Id.eq(id))
        .filter(Column::Collection.eq(collection))
        // `@>` is containment, not equality: a shorter array would count as present
        .filter(Expr::cust_with_values("(body || $1::jsonb) <> body", [patch]))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn delete_in_collection(db: &DatabaseConnection, collection: &str, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Collection.eq(collection))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_identifiers() {
        assert!(validate_collection("bookings").is_ok());
        assert!(validate_collection("booked_services").is_ok());
        assert!(validate_collection("").is_err());
        assert!(validate_collection("users; drop").is_err());
    }
}
