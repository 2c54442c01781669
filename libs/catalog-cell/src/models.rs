// libs/catalog-cell/src/models.rs
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

// ==============================================================================
// CATALOG ENTITIES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// A bookable service. `price` is an exact fixed-point decimal; it
/// serializes as a string so values like "99.99" round-trip without float
/// drift. `category` is populated through the PostgREST embed on reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub category_id: i64,
    #[serde(default)]
    pub category: Option<ServiceCategory>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Raw service payload. `price` stays a JSON value so both `"99.99"` and
/// `99.99` are accepted and parsed exactly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
    pub category_id: Option<i64>,
}

impl ServiceRequest {
    pub fn parse_price(&self) -> Result<Decimal, CatalogError> {
        let price = match &self.price {
            None => Decimal::ZERO,
            Some(Value::String(s)) => Decimal::from_str(s.trim())
                .map_err(|_| CatalogError::InvalidValue("Invalid price".to_string()))?,
            Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
                .map_err(|_| CatalogError::InvalidValue("Invalid price".to_string()))?,
            Some(_) => return Err(CatalogError::InvalidValue("Invalid price".to_string())),
        };

        if price < Decimal::ZERO {
            return Err(CatalogError::InvalidValue("Invalid price".to_string()));
        }
        Ok(price)
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Category not found")]
    CategoryNotFound,

    #[error("Service not found")]
    ServiceNotFound,

    #[error("A category with this name already exists")]
    DuplicateCategoryName,

    #[error("Remove or move services before deleting the category")]
    CategoryHasServices,

    #[error("{0}")]
    InvalidValue(String),

    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<String>),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_parses_from_string_exactly() {
        let request = ServiceRequest {
            price: Some(json!("99.99")),
            ..Default::default()
        };
        let price = request.parse_price().unwrap();
        assert_eq!(price.to_string(), "99.99");
    }

    #[test]
    fn price_parses_from_number() {
        let request = ServiceRequest {
            price: Some(json!(150)),
            ..Default::default()
        };
        assert_eq!(request.parse_price().unwrap(), Decimal::from(150));
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let request = ServiceRequest::default();
        assert_eq!(request.parse_price().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn negative_price_is_rejected() {
        let request = ServiceRequest {
            price: Some(json!("-1.00")),
            ..Default::default()
        };
        assert!(matches!(request.parse_price(), Err(CatalogError::InvalidValue(_))));
    }

    #[test]
    fn garbage_price_is_rejected() {
        let request = ServiceRequest {
            price: Some(json!("sto zlotych")),
            ..Default::default()
        };
        assert!(matches!(request.parse_price(), Err(CatalogError::InvalidValue(_))));
    }

    #[test]
    fn price_survives_a_serde_round_trip() {
        let service = Service {
            id: 1,
            name: "Konsultacja".to_string(),
            description: None,
            price: Decimal::from_str("99.99").unwrap(),
            duration_minutes: 45,
            is_active: true,
            category_id: 1,
            category: None,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_string(&service).unwrap();
        let back: Service = serde_json::from_str(&json).unwrap();
        assert_eq!(back.price, service.price);
        assert_eq!(back.price.to_string(), "99.99");
    }
}
