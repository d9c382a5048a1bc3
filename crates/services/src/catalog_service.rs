use std::sync::Arc;

use quiz_core::model::{TestName, TestType, TestTypeId};
use storage::repository::CatalogRepository;

use crate::error::CatalogError;

/// Test types and names offered by the selection panel.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    types: Vec<TestType>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self {
            catalog,
            types: vec![TestType::clustering()],
        }
    }

    #[must_use]
    pub fn test_types(&self) -> &[TestType] {
        &self.types
    }

    /// # Errors
    ///
    /// Returns `CatalogError::UnknownType` for unlisted types and
    /// `CatalogError::Storage` when the names cannot be fetched.
    pub async fn list_test_names(&self, test_type: TestTypeId) -> Result<Vec<TestName>, CatalogError> {
        if !self.types.iter().any(|t| t.id == test_type) {
            return Err(CatalogError::UnknownType(test_type.value()));
        }
        Ok(self.catalog.list_test_names(test_type).await?)
    }
}
