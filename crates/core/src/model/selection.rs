use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{TestName, TestTypeId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("no test type selected")]
    MissingType,

    #[error("no test name selected")]
    MissingName,

    #[error("problem count must be > 0")]
    ZeroProblems,
}

/// A known category of tests, as offered by the type picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestType {
    pub id: TestTypeId,
    pub label: String,
}

impl TestType {
    /// The clustering test type: pick the option that belongs to the same
    /// cluster as the prompt.
    #[must_use]
    pub fn clustering() -> Self {
        Self {
            id: TestTypeId::CLUSTERING,
            label: "聚类".to_string(),
        }
    }
}

/// What the user currently has picked. Either half may still be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSelection {
    pub test_type: Option<TestTypeId>,
    pub test_name: Option<TestName>,
}

impl TestSelection {
    #[must_use]
    pub fn new(test_type: TestTypeId, test_name: TestName) -> Self {
        Self {
            test_type: Some(test_type),
            test_name: Some(test_name),
        }
    }

    /// Builds a selection from raw picker values, mapping sentinels to unset.
    #[must_use]
    pub fn from_raw(test_type: &str, test_name: &str) -> Self {
        Self {
            test_type: test_type.parse().ok(),
            test_name: TestName::new(test_name),
        }
    }

    /// Changing the type invalidates the chosen name.
    pub fn set_type(&mut self, test_type: Option<TestTypeId>) {
        if self.test_type != test_type {
            self.test_name = None;
        }
        self.test_type = test_type;
    }

    pub fn set_name(&mut self, test_name: Option<TestName>) {
        self.test_name = test_name;
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.test_type.is_some() && self.test_name.is_some()
    }

    /// # Errors
    ///
    /// Returns `SelectionError::MissingType` or `SelectionError::MissingName`
    /// when either half is unset.
    pub fn validate(&self) -> Result<ValidSelection, SelectionError> {
        let test_type = self.test_type.ok_or(SelectionError::MissingType)?;
        let test_name = self.test_name.clone().ok_or(SelectionError::MissingName)?;
        Ok(ValidSelection {
            test_type,
            test_name,
        })
    }
}

/// A fully specified `(type, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidSelection {
    test_type: TestTypeId,
    test_name: TestName,
}

impl ValidSelection {
    #[must_use]
    pub fn new(test_type: TestTypeId, test_name: TestName) -> Self {
        Self {
            test_type,
            test_name,
        }
    }

    #[must_use]
    pub fn test_type(&self) -> TestTypeId {
        self.test_type
    }

    #[must_use]
    pub fn test_name(&self) -> &TestName {
        &self.test_name
    }
}
