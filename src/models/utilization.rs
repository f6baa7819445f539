use serde::{Deserialize, Serialize};

use super::donation::display_purpose;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationRecord {
    #[serde(rename = "utilization_id")]
    pub id: i64,
    #[serde(default)]
    pub donation_id: Option<i64>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub amount_utilized: Option<f64>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub beneficiaries: Option<u64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub utilized_at: Option<String>,
    #[serde(default)]
    pub ngo_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UtilizationRecordsResponse {
    #[serde(default)]
    pub records: Option<Vec<serde_json::Value>>,
}

impl UtilizationRecordsResponse {
    pub fn into_records(self) -> Vec<UtilizationRecord> {
        super::decode_entries(self.records, "utilization")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationBreakdownItem {
    pub purpose: String,
    pub amount: f64,
    /// 100 when any amount was utilized, else 0. Not a share of the total.
    pub percentage: u8,
}

impl From<&UtilizationRecord> for UtilizationBreakdownItem {
    fn from(record: &UtilizationRecord) -> Self {
        let amount = record.amount_utilized.unwrap_or(0.0);
        // TODO: report the share of total utilized funds once the summary
        // panel is reworked to show proportions instead of a binary flag.
        let percentage = if amount != 0.0 && !amount.is_nan() { 100 } else { 0 };

        Self {
            purpose: display_purpose(record.purpose.as_deref()),
            amount: if amount.is_nan() { 0.0 } else { amount },
            percentage,
        }
    }
}
