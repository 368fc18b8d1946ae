// self
use crate::{
	auth::ProviderId,
	obs::{FlowKind, FlowOutcome},
};

/// Bumps `oauth2_identity_flow_total{flow, provider, outcome}` on the global recorder.
///
/// Without the `metrics` feature this compiles to nothing.
pub fn record_flow_outcome(kind: FlowKind, provider: &ProviderId, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oauth2_identity_flow_total",
		"flow" => kind.as_str(),
		"provider" => provider.to_string(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, provider, outcome);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_an_installed_recorder_is_silent() {
		let orcid = ProviderId::new("ORCID").expect("Provider fixture should be valid.");

		record_flow_outcome(FlowKind::UserInfo, &orcid, FlowOutcome::Attempt);
		record_flow_outcome(FlowKind::UserInfo, &orcid, FlowOutcome::Failure);
		record_flow_outcome(FlowKind::AuthorizationCode, &orcid, FlowOutcome::Success);
	}
}
