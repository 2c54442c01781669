// libs/catalog-cell/src/repository.rs
use std::sync::Arc;

use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::PostgrestClient;

use crate::models::{CatalogError, Service, ServiceCategory};

const SERVICE_SELECT: &str = "select=*,category:service_categories(*)";

/// Persistence boundary for the service catalog.
pub struct CatalogRepository {
    db: Arc<PostgrestClient>,
}

impl CatalogRepository {
    pub fn new(db: Arc<PostgrestClient>) -> Self {
        Self { db }
    }

    // ==========================================================================
    // CATEGORIES
    // ==========================================================================

    pub async fn list_categories(&self) -> Result<Vec<ServiceCategory>, CatalogError> {
        let result: Vec<Value> = self
            .db
            .request(Method::GET, "/service_categories?order=name.asc", None)
            .await
            .map_err(db_err)?;

        parse_rows(result)
    }

    pub async fn get_category(&self, id: i64) -> Result<ServiceCategory, CatalogError> {
        let path = format!("/service_categories?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        let row = result.into_iter().next().ok_or(CatalogError::CategoryNotFound)?;
        parse_row(row)
    }

    /// Case-insensitive exact-name lookup (`ilike` without wildcards).
    pub async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ServiceCategory>, CatalogError> {
        let path = format!("/service_categories?name=ilike.{}", encode(name));
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        result.into_iter().next().map(parse_row).transpose()
    }

    pub async fn insert_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ServiceCategory, CatalogError> {
        let body = json!({ "name": name, "description": description });
        let result: Vec<Value> = self
            .db
            .request_returning(Method::POST, "/service_categories", Some(body))
            .await
            .map_err(db_err)?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::DatabaseError("Insert returned no rows".to_string()))?;
        debug!("Category created: {}", name);
        parse_row(row)
    }

    pub async fn update_category(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<ServiceCategory, CatalogError> {
        let path = format!("/service_categories?id=eq.{}", id);
        let body = json!({ "name": name, "description": description });
        let result: Vec<Value> = self
            .db
            .request_returning(Method::PATCH, &path, Some(body))
            .await
            .map_err(db_err)?;

        let row = result.into_iter().next().ok_or(CatalogError::CategoryNotFound)?;
        parse_row(row)
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), CatalogError> {
        let path = format!("/service_categories?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_returning(Method::DELETE, &path, None)
            .await
            .map_err(db_err)?;

        if result.is_empty() {
            return Err(CatalogError::CategoryNotFound);
        }
        Ok(())
    }

    /// Number of services still referencing a category; guards deletion.
    pub async fn count_services_in_category(&self, category_id: i64) -> Result<usize, CatalogError> {
        let path = format!("/services?category_id=eq.{}&select=id", category_id);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        Ok(result.len())
    }

    // ==========================================================================
    // SERVICES
    // ==========================================================================

    /// Active services first, then alphabetical, with the owning category
    /// embedded.
    pub async fn list_services(&self) -> Result<Vec<Service>, CatalogError> {
        let path = format!("/services?{}&order=is_active.desc,name.asc", SERVICE_SELECT);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        parse_rows(result)
    }

    pub async fn get_service(&self, id: i64) -> Result<Service, CatalogError> {
        let path = format!("/services?id=eq.{}&{}", id, SERVICE_SELECT);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        let row = result.into_iter().next().ok_or(CatalogError::ServiceNotFound)?;
        parse_row(row)
    }

    /// Case-insensitive exact-name lookup used by booking to resolve the
    /// free-text service field into a foreign key.
    pub async fn find_service_by_name(&self, name: &str) -> Result<Option<Service>, CatalogError> {
        let path = format!("/services?name=ilike.{}&{}", encode(name), SERVICE_SELECT);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(db_err)?;

        result.into_iter().next().map(parse_row).transpose()
    }

    pub async fn insert_service(&self, fields: ServiceFields<'_>) -> Result<Service, CatalogError> {
        let path = format!("/services?{}", SERVICE_SELECT);
        let result: Vec<Value> = self
            .db
            .request_returning(Method::POST, &path, Some(fields.to_body()))
            .await
            .map_err(db_err)?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::DatabaseError("Insert returned no rows".to_string()))?;
        debug!("Service created: {}", fields.name);
        parse_row(row)
    }

    pub async fn update_service(
        &self,
        id: i64,
        fields: ServiceFields<'_>,
    ) -> Result<Service, CatalogError> {
        let path = format!("/services?id=eq.{}&{}", id, SERVICE_SELECT);
        let result: Vec<Value> = self
            .db
            .request_returning(Method::PATCH, &path, Some(fields.to_body()))
            .await
            .map_err(db_err)?;

        let row = result.into_iter().next().ok_or(CatalogError::ServiceNotFound)?;
        parse_row(row)
    }

    pub async fn delete_service(&self, id: i64) -> Result<(), CatalogError> {
        let path = format!("/services?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_returning(Method::DELETE, &path, None)
            .await
            .map_err(db_err)?;

        if result.is_empty() {
            return Err(CatalogError::ServiceNotFound);
        }
        Ok(())
    }
}

/// Validated column values for a service write.
pub struct ServiceFields<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub category_id: i64,
}

impl ServiceFields<'_> {
    fn to_body(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "duration_minutes": self.duration_minutes,
            "is_active": self.is_active,
            "category_id": self.category_id,
        })
    }
}

fn db_err(e: anyhow::Error) -> CatalogError {
    CatalogError::DatabaseError(e.to_string())
}

fn parse_row<T: serde::de::DeserializeOwned>(row: Value) -> Result<T, CatalogError> {
    serde_json::from_value(row)
        .map_err(|e| CatalogError::DatabaseError(format!("Failed to parse catalog row: {}", e)))
}

fn parse_rows<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, CatalogError> {
    rows.into_iter().map(parse_row).collect()
}

fn encode(value: &str) -> String {
    // PostgREST filter values: spaces and reserved characters are
    // percent-encoded; `ilike` without wildcards gives an exact
    // case-insensitive match.
    value
        .chars()
        .flat_map(|c| match c {
            ' ' => "%20".chars().collect::<Vec<_>>(),
            ',' => "%2C".chars().collect(),
            '&' => "%26".chars().collect(),
            '%' => "%25".chars().collect(),
            '#' => "%23".chars().collect(),
            '?' => "%3F".chars().collect(),
            other => vec![other],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_escapes_query_breaking_characters() {
        assert_eq!(encode("Podstawowe zabiegi"), "Podstawowe%20zabiegi");
        assert_eq!(encode("a&b"), "a%26b");
        assert_eq!(encode("100%"), "100%25");
    }
}
