//! Offer settings entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::offer::{DiscountType, OfferSettings};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for discount_type that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "discount_type", rename_all = "lowercase")]
pub enum DiscountTypeDb {
    Percent,
    Fixed,
}

impl From<DiscountTypeDb> for DiscountType {
    fn from(value: DiscountTypeDb) -> Self {
        match value {
            DiscountTypeDb::Percent => DiscountType::Percent,
            DiscountTypeDb::Fixed => DiscountType::Fixed,
        }
    }
}

impl From<DiscountType> for DiscountTypeDb {
    fn from(value: DiscountType) -> Self {
        match value {
            DiscountType::Percent => DiscountTypeDb::Percent,
            DiscountType::Fixed => DiscountTypeDb::Fixed,
        }
    }
}

/// Database row mapping for the offer_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct OfferSettingEntity {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub discount_type: DiscountTypeDb,
    pub discount_value: i64,
    pub max_orders_per_user: i32,
    pub min_order_value: i64,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OfferSettingEntity> for OfferSettings {
    fn from(entity: OfferSettingEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            active: entity.active,
            discount_type: entity.discount_type.into(),
            discount_value: entity.discount_value,
            max_orders_per_user: entity.max_orders_per_user,
            min_order_value: entity.min_order_value,
            valid_until: entity.valid_until,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_type_roundtrip() {
        assert_eq!(
            DiscountType::from(DiscountTypeDb::Percent),
            DiscountType::Percent
        );
        assert_eq!(DiscountTypeDb::from(DiscountType::Fixed), DiscountTypeDb::Fixed);
    }

    #[test]
    fn test_entity_into_domain() {
        let now = Utc::now();
        let entity = OfferSettingEntity {
            id: Uuid::new_v4(),
            name: "Launch Offer".to_string(),
            active: true,
            discount_type: DiscountTypeDb::Fixed,
            discount_value: 200,
            max_orders_per_user: 3,
            min_order_value: 500,
            valid_until: None,
            created_at: now,
            updated_at: now,
        };

        let settings = OfferSettings::from(entity.clone());
        assert_eq!(settings.id, entity.id);
        assert_eq!(settings.discount_type, DiscountType::Fixed);
        assert_eq!(settings.discount_value, 200);
        assert_eq!(settings.min_order_value, 500);
    }
}
