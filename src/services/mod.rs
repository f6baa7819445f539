pub mod detail_view;
pub mod donation_correlator;
pub mod metrics;
pub mod ngo_resolver;
pub mod scope;
pub mod state;
pub mod utilization_correlator;

pub use detail_view::{NavigationTarget, Navigate, NgoDetailView, ViewPhase, ViewSnapshot};
pub use donation_correlator::DonationCorrelator;
pub use ngo_resolver::{NgoResolver, Resolution};
pub use utilization_correlator::UtilizationCorrelator;
