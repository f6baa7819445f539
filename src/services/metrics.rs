//! Display metrics derived from the resolved profile and correlated records.
//!
//! Everything here is pure and cheap; the view recomputes it on every
//! snapshot instead of caching derived values next to the raw state.

use serde::Serialize;

use crate::models::{
    DisplayDonation, DonationRecord, NgoProfile, UtilizationBreakdownItem, UtilizationRecord,
    MISSING_DATE,
};
use crate::services::{donation_correlator, utilization_correlator};

pub const CURRENCY_SYMBOL: &str = "₹";
pub const NOT_AVAILABLE: &str = "Not available";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactMetric {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactMetrics {
    pub beneficiaries: u64,
    pub active_projects: u64,
    pub funds_received: f64,
    pub transparency_percent: f64,
}

impl ImpactMetrics {
    pub fn from_profile(profile: &NgoProfile) -> Self {
        Self {
            beneficiaries: profile.beneficiaries.unwrap_or(0),
            active_projects: profile.project_count.unwrap_or(0),
            funds_received: profile.funds_received.unwrap_or(0.0),
            transparency_percent: profile.utilization_percent.unwrap_or(0.0),
        }
    }

    /// Metric cards in display order
    pub fn cards(&self) -> Vec<ImpactMetric> {
        vec![
            ImpactMetric {
                label: "Beneficiaries",
                value: format_grouped(self.beneficiaries as f64),
            },
            ImpactMetric {
                label: "Active Projects",
                value: self.active_projects.to_string(),
            },
            ImpactMetric {
                label: "Funds Received",
                value: format!("{}{}", CURRENCY_SYMBOL, format_grouped(self.funds_received)),
            },
            ImpactMetric {
                label: "Transparency",
                value: format!("{}%", self.transparency_percent),
            },
        ]
    }
}

/// Statistics panel. Unlike the impact cards, funds here fall back to
/// `totalFunds` when `fundsReceived` is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NgoStatistics {
    pub funds: f64,
    pub funds_in_thousands: String,
    pub beneficiaries: u64,
    pub active_projects: u64,
}

impl NgoStatistics {
    pub fn from_profile(profile: &NgoProfile) -> Self {
        let funds = profile.funds_display();
        Self {
            funds,
            funds_in_thousands: funds_in_thousands(funds),
            beneficiaries: profile.beneficiaries.unwrap_or(0),
            active_projects: profile.project_count.unwrap_or(0),
        }
    }

    pub fn funds_label(&self) -> String {
        format!("{}{}K", CURRENCY_SYMBOL, self.funds_in_thousands)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderDisplay {
    pub name: String,
    pub location: Option<String>,
    pub sector: Option<String>,
    pub description: Option<String>,
    pub founded: String,
    pub rating: f64,
    pub overall_utilization_percent: f64,
}

impl HeaderDisplay {
    pub fn from_profile(profile: &NgoProfile) -> Self {
        Self {
            name: profile.name.clone(),
            location: profile.location.clone(),
            sector: profile.sector.clone(),
            description: profile.description.clone(),
            founded: non_empty(profile.founded_year.as_deref())
                .unwrap_or(MISSING_DATE)
                .to_string(),
            rating: profile.rating_display(),
            overall_utilization_percent: profile.utilization_percent.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactEntry {
    pub text: String,
    pub href: Option<String>,
}

impl ContactEntry {
    fn link(value: Option<&str>, scheme: &str) -> Self {
        match non_empty(value) {
            Some(v) => Self {
                text: v.to_string(),
                href: Some(format!("{}{}", scheme, v)),
            },
            None => Self {
                text: NOT_AVAILABLE.to_string(),
                href: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactDisplay {
    pub website: ContactEntry,
    pub email: ContactEntry,
    pub phone: ContactEntry,
}

impl ContactDisplay {
    pub fn from_profile(profile: &NgoProfile) -> Self {
        Self {
            website: ContactEntry::link(profile.website.as_deref(), "https://"),
            email: ContactEntry::link(profile.email.as_deref(), "mailto:"),
            phone: ContactEntry::link(profile.phone.as_deref(), "tel:"),
        }
    }
}

/// Everything the detail page renders once the profile is resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NgoDetails {
    pub profile: NgoProfile,
    pub header: HeaderDisplay,
    pub contact: ContactDisplay,
    pub impact: ImpactMetrics,
    pub impact_cards: Vec<ImpactMetric>,
    pub statistics: NgoStatistics,
    pub donations: Vec<DisplayDonation>,
    pub total_donated: f64,
    pub utilization_breakdown: Vec<UtilizationBreakdownItem>,
}

pub fn derive_details(
    profile: &NgoProfile,
    donations: &[DonationRecord],
    utilization: &[UtilizationRecord],
) -> NgoDetails {
    let donations = donation_correlator::to_display(donations);
    let impact = ImpactMetrics::from_profile(profile);

    NgoDetails {
        profile: profile.clone(),
        header: HeaderDisplay::from_profile(profile),
        contact: ContactDisplay::from_profile(profile),
        impact_cards: impact.cards(),
        impact,
        statistics: NgoStatistics::from_profile(profile),
        total_donated: total_donated(&donations),
        donations,
        utilization_breakdown: utilization_correlator::breakdown(utilization),
    }
}

pub fn total_donated(donations: &[DisplayDonation]) -> f64 {
    donations.iter().fold(0.0, |sum, d| sum + d.amount)
}

/// `funds / 1000` with no decimals, halves rounded away from zero
pub fn funds_in_thousands(funds: f64) -> String {
    let thousands = (funds / 1000.0).round();
    if thousands == 0.0 || thousands.is_nan() {
        return "0".to_string();
    }
    format!("{}", thousands)
}

/// Thousands-grouped number with at most three fraction digits
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && rounded != 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
