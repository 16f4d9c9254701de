//! Scrap record models
//!
//! Scrap reporting is a side-channel next to the allocation chain; it
//! shares the same departments and roles but never touches inventory.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::material_request::UnknownStatus;

/// Lifecycle of a scrap record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScrapStatus {
    Reported,
    Approved,
    Processed,
}

impl ScrapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapStatus::Reported => "reported",
            ScrapStatus::Approved => "approved",
            ScrapStatus::Processed => "processed",
        }
    }
}

impl FromStr for ScrapStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reported" => Ok(ScrapStatus::Reported),
            "approved" => Ok(ScrapStatus::Approved),
            "processed" => Ok(ScrapStatus::Processed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}
