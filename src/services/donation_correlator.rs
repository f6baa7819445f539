use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::http_client::{HttpClient, DONATION_RECORDS_ENDPOINT};
use crate::models::{DisplayDonation, DonationRecord, DonationRecordsResponse};

pub struct DonationCorrelator {
    client: HttpClient,
}

impl DonationCorrelator {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Donation records whose `ngo_name` equals `ngo_name` exactly
    pub async fn correlate(
        &self,
        ngo_name: &str,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<DonationRecord>> {
        let response: DonationRecordsResponse =
            self.client.get_json(DONATION_RECORDS_ENDPOINT, cancel).await?;
        let records = filter_for_ngo(response.into_records(), ngo_name);
        tracing::debug!(ngo_name, count = records.len(), "Donations correlated");
        Ok(records)
    }
}

pub fn filter_for_ngo(records: Vec<DonationRecord>, ngo_name: &str) -> Vec<DonationRecord> {
    records
        .into_iter()
        .filter(|r| r.ngo_name.as_deref() == Some(ngo_name))
        .collect()
}

pub fn to_display(records: &[DonationRecord]) -> Vec<DisplayDonation> {
    records.iter().map(DisplayDonation::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation(id: i64, ngo_name: Option<&str>) -> DonationRecord {
        DonationRecord {
            id,
            donor_name: "X".to_string(),
            amount: 100.0,
            donated_at: None,
            purpose: None,
            amount_utilized: None,
            ngo_name: ngo_name.map(str::to_string),
        }
    }

    #[test]
    fn test_exact_name_match_only() {
        let records = vec![
            donation(1, Some("Acme Trust")),
            donation(2, Some("Acme trust")),
            donation(3, Some("Acme")),
            donation(4, None),
            donation(5, Some("Acme Trust")),
        ];

        let ids: Vec<i64> = filter_for_ngo(records.clone(), "Acme Trust")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 5]);

        let ids: Vec<i64> = filter_for_ngo(records, "Acme")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let records = vec![donation(1, Some("Acme Trust"))];
        assert!(filter_for_ngo(records, "River Trust").is_empty());
    }
}
