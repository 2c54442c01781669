// libs/catalog-cell/src/services/catalog.rs
use std::sync::Arc;

use tracing::info;

use shared_database::PostgrestClient;

use crate::models::{CatalogError, CategoryRequest, Service, ServiceCategory, ServiceRequest};
use crate::repository::{CatalogRepository, ServiceFields};

const DEFAULT_DURATION_MINUTES: i32 = 30;

/// Business rules for the service catalog: category name uniqueness,
/// referential guards on deletion and field validation for writes.
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(db: Arc<PostgrestClient>) -> Self {
        Self {
            repo: CatalogRepository::new(db),
        }
    }

    // ==========================================================================
    // CATEGORIES
    // ==========================================================================

    pub async fn list_categories(&self) -> Result<Vec<ServiceCategory>, CatalogError> {
        self.repo.list_categories().await
    }

    pub async fn get_category(&self, id: i64) -> Result<ServiceCategory, CatalogError> {
        self.repo.get_category(id).await
    }

    pub async fn create_category(
        &self,
        request: CategoryRequest,
    ) -> Result<ServiceCategory, CatalogError> {
        let name = required_name(request.name.as_deref())?;

        // Uniqueness is case-insensitive: "Zabiegi" and "zabiegi" are the
        // same category.
        if self.repo.find_category_by_name(&name).await?.is_some() {
            return Err(CatalogError::DuplicateCategoryName);
        }

        let category = self
            .repo
            .insert_category(&name, non_blank(request.description.as_deref()))
            .await?;
        info!("Category created: {} (id {})", category.name, category.id);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: i64,
        request: CategoryRequest,
    ) -> Result<ServiceCategory, CatalogError> {
        let existing = self.repo.get_category(id).await?;

        let name = match request.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => existing.name.clone(),
        };

        // Renaming onto another category's name is a conflict; renaming onto
        // a different casing of the current name is fine.
        if let Some(other) = self.repo.find_category_by_name(&name).await? {
            if other.id != id {
                return Err(CatalogError::DuplicateCategoryName);
            }
        }

        let description = request
            .description
            .as_deref()
            .or(existing.description.as_deref());

        self.repo.update_category(id, &name, description).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), CatalogError> {
        self.repo.get_category(id).await?;

        if self.repo.count_services_in_category(id).await? > 0 {
            return Err(CatalogError::CategoryHasServices);
        }

        self.repo.delete_category(id).await?;
        info!("Category deleted: id {}", id);
        Ok(())
    }

    // ==========================================================================
    // SERVICES
    // ==========================================================================

    pub async fn list_services(&self) -> Result<Vec<Service>, CatalogError> {
        self.repo.list_services().await
    }

    pub async fn get_service(&self, id: i64) -> Result<Service, CatalogError> {
        self.repo.get_service(id).await
    }

    pub async fn create_service(&self, request: ServiceRequest) -> Result<Service, CatalogError> {
        let mut missing = Vec::new();
        let name = request.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            missing.push("name".to_string());
        }
        if request.category_id.is_none() {
            missing.push("category_id".to_string());
        }
        if !missing.is_empty() {
            return Err(CatalogError::MissingFields(missing));
        }

        let category_id = request.category_id.unwrap_or_default();
        self.repo.get_category(category_id).await?;

        let price = request.parse_price()?;
        let duration_minutes = validate_duration(request.duration_minutes)?;

        let service = self
            .repo
            .insert_service(ServiceFields {
                name,
                description: non_blank(request.description.as_deref()),
                price,
                duration_minutes,
                is_active: request.is_active.unwrap_or(true),
                category_id,
            })
            .await?;
        info!("Service created: {} (id {})", service.name, service.id);
        Ok(service)
    }

    pub async fn update_service(
        &self,
        id: i64,
        request: ServiceRequest,
    ) -> Result<Service, CatalogError> {
        let existing = self.repo.get_service(id).await?;

        let name = match request.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => existing.name.clone(),
        };

        let price = if request.price.is_some() {
            request.parse_price()?
        } else {
            existing.price
        };

        let duration_minutes = match request.duration_minutes {
            Some(_) => validate_duration(request.duration_minutes)?,
            None => existing.duration_minutes,
        };

        let category_id = request.category_id.unwrap_or(existing.category_id);
        if category_id != existing.category_id {
            self.repo.get_category(category_id).await?;
        }

        let description = request
            .description
            .as_deref()
            .or(existing.description.as_deref());

        self.repo
            .update_service(
                id,
                ServiceFields {
                    name: &name,
                    description,
                    price,
                    duration_minutes,
                    is_active: request.is_active.unwrap_or(existing.is_active),
                    category_id,
                },
            )
            .await
    }

    pub async fn delete_service(&self, id: i64) -> Result<(), CatalogError> {
        self.repo.delete_service(id).await?;
        info!("Service deleted: id {}", id);
        Ok(())
    }
}

fn required_name(name: Option<&str>) -> Result<String, CatalogError> {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_string()),
        _ => Err(CatalogError::MissingFields(vec!["name".to_string()])),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_duration(duration: Option<i32>) -> Result<i32, CatalogError> {
    match duration {
        None => Ok(DEFAULT_DURATION_MINUTES),
        Some(d) if d > 0 => Ok(d),
        Some(_) => Err(CatalogError::InvalidValue(
            "Duration must be a positive number of minutes".to_string(),
        )),
    }
}
