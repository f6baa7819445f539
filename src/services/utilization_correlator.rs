use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::http_client::{HttpClient, UTILIZATION_RECORDS_ENDPOINT};
use crate::models::{UtilizationBreakdownItem, UtilizationRecord, UtilizationRecordsResponse};

pub struct UtilizationCorrelator {
    client: HttpClient,
}

impl UtilizationCorrelator {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn correlate(
        &self,
        ngo_name: &str,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<UtilizationRecord>> {
        let response: UtilizationRecordsResponse =
            self.client.get_json(UTILIZATION_RECORDS_ENDPOINT, cancel).await?;
        let records = filter_for_ngo(response.into_records(), ngo_name);
        tracing::debug!(ngo_name, count = records.len(), "Utilization records correlated");
        Ok(records)
    }
}

pub fn filter_for_ngo(records: Vec<UtilizationRecord>, ngo_name: &str) -> Vec<UtilizationRecord> {
    records
        .into_iter()
        .filter(|r| r.ngo_name.as_deref() == Some(ngo_name))
        .collect()
}

pub fn breakdown(records: &[UtilizationRecord]) -> Vec<UtilizationBreakdownItem> {
    records.iter().map(UtilizationBreakdownItem::from).collect()
}
