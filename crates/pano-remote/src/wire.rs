//! Request and response shapes of the catalog API

use serde::{Deserialize, Serialize};

/// Every response body wraps its payload in `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// A window into a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    pub fn next(self, received: usize) -> Self {
        Self {
            offset: self.offset + received,
            limit: self.limit,
        }
    }
}

/// A physical data connection of a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalDataSource {
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

/// Work the metadata service can be asked to do for one data connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job_type", rename_all = "snake_case")]
pub enum JobRequest {
    ScanTables {
        source_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_filter: Option<String>,
    },
    RefreshTable {
        source_id: String,
        table_name: String,
    },
    ScanColumns {
        source_id: String,
        table_filter: String,
    },
    GenerateIdentifiers {
        source_id: String,
        table_name: String,
    },
}

impl JobRequest {
    /// Short name used in logs and errors.
    pub fn label(&self) -> String {
        match self {
            Self::ScanTables { table_filter, .. } => match table_filter {
                Some(filter) => format!("scan tables {}", filter),
                None => "scan tables".to_string(),
            },
            Self::RefreshTable { table_name, .. } => format!("refresh {}", table_name),
            Self::ScanColumns { table_filter, .. } => format!("scan columns {}", table_filter),
            Self::GenerateIdentifiers { table_name, .. } => format!("identifiers {}", table_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCreated {
    pub job_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub status: JobState,
}

/// A table found by a table scan. `table_schema` is prefixed with the
/// data connection name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedTable {
    pub table_schema: String,
    pub table_name: String,
}

impl ScannedTable {
    /// `schema.table` without the data connection prefix.
    pub fn sourceless_name(&self) -> String {
        let schema = self
            .table_schema
            .split_once('.')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.table_schema);
        format!("{}.{}", schema, self.table_name)
    }
}

/// One column of a scanned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedColumn {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
}

/// Result row of an identifier generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedIdentifiers {
    pub table_name: String,
    pub identifiers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}
