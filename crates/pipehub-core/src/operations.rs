//! The operator catalog: every operation a pipeline node may reference,
//! with its kind and the task types it supports.
//!
//! The catalog is static data. Validation uses it to reject unknown
//! operations and to require that a pipeline's final operator is a model;
//! the history seeder uses it to pick task-appropriate mutations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The ML task a pipeline is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Classification,
    Regression,
    TsForecasting,
}

impl TaskType {
    /// All task types, in catalog order.
    pub const ALL: [TaskType; 3] = [
        TaskType::Classification,
        TaskType::Regression,
        TaskType::TsForecasting,
    ];

    /// The snake_case name used on the wire and in fixture files.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Classification => "classification",
            TaskType::Regression => "regression",
            TaskType::TsForecasting => "ts_forecasting",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classification" => Ok(TaskType::Classification),
            "regression" => Ok(TaskType::Regression),
            "ts_forecasting" => Ok(TaskType::TsForecasting),
            other => Err(CoreError::UnknownTask {
                name: other.to_string(),
            }),
        }
    }
}

/// Whether an operation produces predictions or transforms features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A predictive model. Only models may terminate a pipeline.
    Model,
    /// A feature transformation applied before modeling.
    DataOperation,
}

/// Catalog entry for one operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationInfo {
    /// Operation identifier as it appears in node descriptors.
    pub name: &'static str,
    pub kind: OperationKind,
    /// Task types this operation supports.
    pub tasks: &'static [TaskType],
}

const CLF: &[TaskType] = &[TaskType::Classification];
const REG: &[TaskType] = &[TaskType::Regression];
const CLF_REG: &[TaskType] = &[TaskType::Classification, TaskType::Regression];
const TS: &[TaskType] = &[TaskType::TsForecasting];
const ANY: &[TaskType] = &TaskType::ALL;

/// The full operator catalog.
pub const CATALOG: &[OperationInfo] = &[
    // Models
    OperationInfo { name: "logit", kind: OperationKind::Model, tasks: CLF },
    OperationInfo { name: "lda", kind: OperationKind::Model, tasks: CLF },
    OperationInfo { name: "qda", kind: OperationKind::Model, tasks: CLF },
    OperationInfo { name: "knn", kind: OperationKind::Model, tasks: CLF },
    OperationInfo { name: "dt", kind: OperationKind::Model, tasks: CLF },
    OperationInfo { name: "rf", kind: OperationKind::Model, tasks: CLF },
    OperationInfo { name: "xgboost", kind: OperationKind::Model, tasks: CLF_REG },
    OperationInfo { name: "linear", kind: OperationKind::Model, tasks: REG },
    OperationInfo { name: "ridge", kind: OperationKind::Model, tasks: REG },
    OperationInfo { name: "lasso", kind: OperationKind::Model, tasks: REG },
    OperationInfo { name: "ar", kind: OperationKind::Model, tasks: TS },
    // Data operations
    OperationInfo { name: "scaling", kind: OperationKind::DataOperation, tasks: ANY },
    OperationInfo { name: "normalization", kind: OperationKind::DataOperation, tasks: ANY },
    OperationInfo { name: "pca", kind: OperationKind::DataOperation, tasks: CLF_REG },
    OperationInfo { name: "poly_features", kind: OperationKind::DataOperation, tasks: REG },
    OperationInfo { name: "one_hot_encoding", kind: OperationKind::DataOperation, tasks: CLF_REG },
    OperationInfo { name: "lagged", kind: OperationKind::DataOperation, tasks: TS },
];

/// Looks up a catalog entry by operation name.
pub fn lookup(name: &str) -> Option<&'static OperationInfo> {
    CATALOG.iter().find(|info| info.name == name)
}

/// Returns `true` if the operation exists in the catalog.
pub fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

/// Returns `true` if the operation is a known model.
pub fn is_model(name: &str) -> bool {
    matches!(lookup(name), Some(info) if info.kind == OperationKind::Model)
}

/// All model names supporting the given task.
pub fn models_for(task: TaskType) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|info| info.kind == OperationKind::Model && info.tasks.contains(&task))
        .map(|info| info.name)
        .collect()
}

/// All data operation names supporting the given task.
pub fn data_operations_for(task: TaskType) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|info| info.kind == OperationKind::DataOperation && info.tasks.contains(&task))
        .map(|info| info.name)
        .collect()
}
