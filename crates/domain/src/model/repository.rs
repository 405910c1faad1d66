use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::LanguageMap;

/// Summary of one traversed repository inside an account snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub name: String,
    pub full_name: String,
    pub languages: LanguageMap,
    pub updated_at: Option<DateTime<Utc>>,
    pub size: u64,
    pub stars: u64,
}
