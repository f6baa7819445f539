use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::http_client::{HttpClient, NGO_LIST_ENDPOINT};
use crate::models::{NgoListResponse, NgoProfile};

/// Outcome of resolving an identifier against the NGO list
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched(NgoProfile),
    /// No NGO carries the identifier; the view shows the default profile
    Placeholder(NgoProfile),
}

impl Resolution {
    pub fn profile(&self) -> &NgoProfile {
        match self {
            Resolution::Matched(p) | Resolution::Placeholder(p) => p,
        }
    }

    pub fn into_profile(self) -> NgoProfile {
        match self {
            Resolution::Matched(p) | Resolution::Placeholder(p) => p,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Resolution::Placeholder(_))
    }
}

pub struct NgoResolver {
    client: HttpClient,
}

impl NgoResolver {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn resolve(&self, ngo_id: i64, cancel: &CancellationToken) -> AppResult<Resolution> {
        let response: NgoListResponse = self.client.get_json(NGO_LIST_ENDPOINT, cancel).await?;
        let resolution = select_profile(response.into_ngos(), ngo_id);

        if resolution.is_placeholder() {
            tracing::info!(ngo_id, "NGO not found in list, using placeholder profile");
        } else {
            tracing::info!(ngo_id, name = %resolution.profile().name, "NGO profile resolved");
        }

        Ok(resolution)
    }
}

pub fn select_profile(ngos: Vec<NgoProfile>, ngo_id: i64) -> Resolution {
    ngos.into_iter()
        .find(|ngo| ngo.id == ngo_id)
        .map(Resolution::Matched)
        .unwrap_or_else(|| Resolution::Placeholder(NgoProfile::placeholder(ngo_id)))
}

/// Message shown in place of the detail view when the profile fetch fails
pub fn failure_message(err: &AppError) -> String {
    match err {
        AppError::Status { .. } => "Failed to load NGO details".to_string(),
        other => format!("Unable to fetch NGO details: {}", other),
    }
}
