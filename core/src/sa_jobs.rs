//! SA job records.
//!
//! Only plain accessors live here. Deciding whether a job was "in control"
//! for a month needs a working-day calendar that has not been specified,
//! so no classifier is provided.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaJob {
    pub id:             String,
    /// When the client's source data became available.
    pub data_date:      NaiveDate,
    #[serde(default)]
    pub chase_events:   Vec<NaiveDate>,
    #[serde(default)]
    pub submitted_date: Option<NaiveDate>,
}

impl SaJob {
    pub fn is_filed(&self) -> bool {
        self.submitted_date.is_some()
    }

    pub fn chase_count(&self) -> usize {
        self.chase_events.len()
    }

    /// Chases logged on or before `date`.
    pub fn chases_by(&self, date: NaiveDate) -> usize {
        self.chase_events.iter().filter(|d| **d <= date).count()
    }
}
