// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	obs::{FlowKind, FlowOutcome},
};

/// Future returned by [`FlowSpan::instrument`]; a passthrough when `tracing` is off.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; a passthrough when `tracing` is off.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// `oauth2_identity.flow` span covering one provider operation.
///
/// The span carries `flow`, `provider`, and `stage` from the start. `outcome` stays empty
/// until [`FlowSpan::record_outcome`] fills it once the operation settles.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `stage` of the `kind` flow run against `provider`.
	pub fn new(kind: FlowKind, provider: &ProviderId, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_identity.flow",
				flow = kind.as_str(),
				provider = %provider,
				stage,
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, provider, stage);

			Self {}
		}
	}

	/// Fills the span's `outcome` field.
	pub fn record_outcome(&self, outcome: FlowOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());
		#[cfg(not(feature = "tracing"))]
		let _ = outcome;
	}

	/// Enters the span for the synchronous authorize-URL step.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Attaches the span to a network-bound future such as a code exchange or profile fetch.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Keeps a [`FlowSpan`] entered until dropped.
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn orcid() -> ProviderId {
		ProviderId::new("ORCID").expect("Provider fixture should be valid.")
	}

	#[test]
	fn authorize_step_holds_a_guard() {
		let span = FlowSpan::new(FlowKind::AuthorizationCode, &orcid(), "start_authorization");

		span.record_outcome(FlowOutcome::Success);

		let guard = span.entered();

		assert_eq!(format!("{guard:?}"), "FlowSpanGuard(..)");
	}

	#[tokio::test]
	async fn profile_fetch_output_passes_through_the_span() {
		let span = FlowSpan::new(FlowKind::UserInfo, &orcid(), "fetch_auth_user");
		let id = span.instrument(async { "0000-0001-2345-6789" }).await;

		span.record_outcome(FlowOutcome::Success);

		assert_eq!(id, "0000-0001-2345-6789");
	}
}
