use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, Unchanged};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub availability: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.is_empty() {
        return Err(errors::ModelError::Validation("product name must not be empty".into()));
    }
    if name.chars().count() > 100 {
        return Err(errors::ModelError::Validation("product name must be at most 100 characters".into()));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(errors::ModelError::Validation("product price must be greater than 0".into()));
    }
    Ok(())
}

/// All products ordered by id.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find().order_by_asc(Column::Id).all(db).await?;
    Ok(rows)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Insert a new product; the database assigns the id and availability starts as `true`.
pub async fn create(db: &DatabaseConnection, name: &str, price: f64) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_price(price)?;

    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        availability: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Overwrite name, price and availability of an existing row and bump `updated_at`.
/// `created_at` is never touched.
pub async fn update(db: &DatabaseConnection, product: Model) -> Result<Model, errors::ModelError> {
    validate_name(&product.name)?;
    validate_price(product.price)?;

    let am = ActiveModel {
        id: Unchanged(product.id),
        name: Set(product.name),
        price: Set(product.price),
        availability: Set(product.availability),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.update(db).await?)
}

/// Hard delete; returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_must_be_positive_and_finite() {
        assert!(validate_price(0.01).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-3.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn name_must_fit_column() {
        assert!(validate_name("Teclado").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn json_uses_camel_case_timestamps() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let m = Model { id: 1, name: "Mouse".into(), price: 10.5, availability: true, created_at: now, updated_at: now };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["id"], 1);
        assert_eq!(v["price"], 10.5);
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
        assert!(v.get("created_at").is_none());
    }
}
