use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_RATING: f64 = 4.5;
pub const PLACEHOLDER_NAME: &str = "Education For All";
pub const PLACEHOLDER_UTILIZATION_PERCENT: f64 = 85.0;

/// NGO entry as served by `/api/ngo/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgoProfile {
    #[serde(rename = "ngo_id")]
    pub id: i64,
    /// Correlation key for donation and utilization records
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "fundsReceived", default)]
    pub funds_received: Option<f64>,
    #[serde(rename = "utilized", default)]
    pub utilization_percent: Option<f64>,
    #[serde(default)]
    pub beneficiaries: Option<u64>,
    #[serde(rename = "projects", default)]
    pub project_count: Option<u64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "founded", default, deserialize_with = "string_or_number")]
    pub founded_year: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "totalFunds", default)]
    pub total_funds: Option<f64>,
}

impl NgoProfile {
    /// Profile shown when the requested identifier matches no NGO
    pub fn placeholder(id: i64) -> Self {
        Self {
            id,
            name: PLACEHOLDER_NAME.to_string(),
            sector: Some("Education".to_string()),
            location: Some("India".to_string()),
            description: Some("Trusted NGO making a difference.".to_string()),
            funds_received: Some(0.0),
            utilization_percent: Some(PLACEHOLDER_UTILIZATION_PERCENT),
            beneficiaries: Some(0),
            project_count: Some(0),
            phone: Some(String::new()),
            registration_number: None,
            website: None,
            email: None,
            founded_year: None,
            rating: Some(DEFAULT_RATING),
            total_funds: None,
        }
    }

    /// fundsReceived, then totalFunds, then zero
    pub fn funds_display(&self) -> f64 {
        self.funds_received.or(self.total_funds).unwrap_or(0.0)
    }

    pub fn rating_display(&self) -> f64 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }
}

#[derive(Debug, Deserialize)]
pub struct NgoListResponse {
    #[serde(default)]
    pub ngos: Option<Vec<serde_json::Value>>,
}

impl NgoListResponse {
    pub fn into_ngos(self) -> Vec<NgoProfile> {
        super::decode_entries(self.ngos, "ngo")
    }
}

// The backend has served `founded` both as "1998" and as 1998.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{
            "ngo_id": 7,
            "name": "Hope Foundation",
            "fundsReceived": 500000,
            "utilized": 70,
            "projects": 4,
            "beneficiaries": 200,
            "registration_number": "REG-1",
            "founded": 1998
        }"#;
        let ngo: NgoProfile = serde_json::from_str(json).unwrap();
        assert_eq!(ngo.id, 7);
        assert_eq!(ngo.funds_received, Some(500000.0));
        assert_eq!(ngo.utilization_percent, Some(70.0));
        assert_eq!(ngo.project_count, Some(4));
        assert_eq!(ngo.registration_number.as_deref(), Some("REG-1"));
        assert_eq!(ngo.founded_year.as_deref(), Some("1998"));
        assert_eq!(ngo.rating, None);
    }

    #[test]
    fn test_funds_display_fallback_order() {
        let mut ngo = NgoProfile::placeholder(1);
        ngo.funds_received = None;
        ngo.total_funds = Some(42_000.0);
        assert_eq!(ngo.funds_display(), 42_000.0);

        ngo.funds_received = Some(10.0);
        assert_eq!(ngo.funds_display(), 10.0);

        ngo.funds_received = None;
        ngo.total_funds = None;
        assert_eq!(ngo.funds_display(), 0.0);
    }

    #[test]
    fn test_placeholder_defaults() {
        let ngo = NgoProfile::placeholder(3);
        assert_eq!(ngo.id, 3);
        assert_eq!(ngo.name, "Education For All");
        assert_eq!(ngo.utilization_percent, Some(85.0));
        assert_eq!(ngo.rating_display(), 4.5);
    }

    #[test]
    fn test_missing_or_null_list_is_empty() {
        let empty: NgoListResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_ngos().is_empty());
        let null: NgoListResponse = serde_json::from_str(r#"{"ngos": null}"#).unwrap();
        assert!(null.into_ngos().is_empty());
    }
}
