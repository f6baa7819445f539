use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PURPOSE: &str = "General";
pub const MISSING_DATE: &str = "—";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    #[serde(rename = "donation_id")]
    pub id: i64,
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub donated_at: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub amount_utilized: Option<f64>,
    #[serde(default)]
    pub ngo_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DonationRecordsResponse {
    #[serde(default)]
    pub donations: Option<Vec<serde_json::Value>>,
}

impl DonationRecordsResponse {
    pub fn into_records(self) -> Vec<DonationRecord> {
        super::decode_entries(self.donations, "donation")
    }
}

/// A donation as listed under "Your Contributions"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDonation {
    pub id: i64,
    pub amount: f64,
    pub date: String,
    pub purpose: String,
    pub utilization_percent: u8,
}

impl From<&DonationRecord> for DisplayDonation {
    fn from(record: &DonationRecord) -> Self {
        Self {
            id: record.id,
            amount: record.amount,
            date: display_date(record.donated_at.as_deref()),
            purpose: display_purpose(record.purpose.as_deref()),
            utilization_percent: utilization_percent(record.amount, record.amount_utilized),
        }
    }
}

/// `round(utilized / amount * 100)` capped at 100; zero when nothing is
/// known to be utilized or the amount is zero.
pub fn utilization_percent(amount: f64, amount_utilized: Option<f64>) -> u8 {
    match amount_utilized {
        Some(utilized) if amount > 0.0 => {
            let percent = (utilized / amount * 100.0).round();
            if percent.is_nan() {
                0
            } else {
                percent.clamp(0.0, 100.0) as u8
            }
        }
        _ => 0,
    }
}

pub fn display_purpose(purpose: Option<&str>) -> String {
    match purpose {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => DEFAULT_PURPOSE.to_string(),
    }
}

/// Date portion of a record timestamp, or "—" when absent
pub fn display_date(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return MISSING_DATE.to_string(),
    };

    parse_date(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.split('T').next().unwrap_or(raw).to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: f64, amount_utilized: Option<f64>) -> DonationRecord {
        DonationRecord {
            id: 1,
            donor_name: "X".to_string(),
            amount,
            donated_at: None,
            purpose: None,
            amount_utilized,
            ngo_name: Some("Hope Foundation".to_string()),
        }
    }

    #[test]
    fn test_utilization_percent() {
        assert_eq!(utilization_percent(1000.0, Some(500.0)), 50);
        assert_eq!(utilization_percent(3.0, Some(1.0)), 33);
        assert_eq!(utilization_percent(8.0, Some(1.0)), 13);
        assert_eq!(utilization_percent(100.0, Some(250.0)), 100);
        assert_eq!(utilization_percent(100.0, None), 0);
        assert_eq!(utilization_percent(0.0, Some(50.0)), 0);
    }

    #[test]
    fn test_display_donation_defaults() {
        let display = DisplayDonation::from(&record(1000.0, None));
        assert_eq!(display.date, "—");
        assert_eq!(display.purpose, "General");
        assert_eq!(display.utilization_percent, 0);
    }

    #[test]
    fn test_empty_purpose_falls_back() {
        assert_eq!(display_purpose(Some("")), "General");
        assert_eq!(display_purpose(Some("Food")), "Food");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(Some("2024-03-05T10:15:00Z")), "2024-03-05");
        assert_eq!(display_date(Some("2024-03-05T23:30:00-05:00")), "2024-03-05");
        assert_eq!(display_date(Some("2024-03-05T10:15:00.123456")), "2024-03-05");
        assert_eq!(display_date(Some("2024-03-05 10:15:00")), "2024-03-05");
        assert_eq!(display_date(Some("2024-03-05")), "2024-03-05");
        assert_eq!(display_date(Some("March 5Tue")), "March 5");
        assert_eq!(display_date(Some("")), "—");
        assert_eq!(display_date(None), "—");
    }

    #[test]
    fn test_bad_record_does_not_drop_the_list() {
        let json = r#"{"donations":[
            {"donation_id":1,"amount":null,"ngo_name":"River Trust"},
            {"donation_id":9,"amount":1000,"ngo_name":"Hope Foundation"}
        ]}"#;
        let response: DonationRecordsResponse = serde_json::from_str(json).unwrap();
        let records = response.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 9);
    }

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{"donation_id":9,"donor_name":"X","amount":1000,"amount_utilized":500,"ngo_name":"Hope Foundation","purpose":"Food"}"#;
        let record: DonationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 9);
        assert_eq!(record.amount_utilized, Some(500.0));
        assert_eq!(record.ngo_name.as_deref(), Some("Hope Foundation"));
    }
}
