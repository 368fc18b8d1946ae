//! Authorization Code + PKCE helpers shared by every [`BaseProvider`].

mod session;

pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::BasicFacade,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::BaseProvider,
};

impl<C> BaseProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Generates state (and PKCE when the descriptor requires it) and builds the authorize URL.
	///
	/// Fails with [`ConfigError::MissingRedirectUri`] when the client has no redirect URI.
	pub fn start_authorization(&self) -> Result<AuthorizationSession> {
		const KIND: FlowKind = FlowKind::AuthorizationCode;

		let provider = &self.descriptor.id;
		let span = FlowSpan::new(KIND, provider, "start_authorization");

		obs::record_flow_outcome(KIND, provider, FlowOutcome::Attempt);

		let _guard = span.clone().entered();
		let Some(redirect_uri) = self.client.redirect_uri.clone() else {
			span.record_outcome(FlowOutcome::Failure);
			obs::record_flow_outcome(KIND, provider, FlowOutcome::Failure);

			return Err(ConfigError::MissingRedirectUri.into());
		};
		let session = build_session(&self.descriptor, &self.client.client_id, redirect_uri);

		#[cfg(feature = "tracing")]
		tracing::debug!(
			provider = %self.descriptor.id,
			pkce = session.code_challenge().is_some(),
			"authorize url built"
		);

		span.record_outcome(FlowOutcome::Success);
		obs::record_flow_outcome(KIND, provider, FlowOutcome::Success);

		Ok(session)
	}

	/// Exchanges the authorization code returned to the redirect handler for a [`Token`].
	///
	/// Callers should run [`AuthorizationSession::validate_state`] first.
	pub async fn exchange_code(&self, session: &AuthorizationSession, code: &str) -> Result<Token> {
		const KIND: FlowKind = FlowKind::AuthorizationCode;

		let provider = &self.descriptor.id;
		let span = FlowSpan::new(KIND, provider, "exchange_code");

		obs::record_flow_outcome(KIND, provider, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let facade = <BasicFacade<C>>::from_provider(
					&self.descriptor,
					&self.client,
					self.http_client.clone(),
				)?;
				let token = facade
					.exchange_authorization_code(
						code,
						session.pkce_verifier(),
						&session.redirect_uri,
					)
					.await?;

				#[cfg(feature = "tracing")]
				tracing::debug!(
					provider = %self.descriptor.id,
					extras = token.extras().len(),
					"authorization code exchanged"
				);

				Ok(token)
			})
			.await;

		let outcome = FlowOutcome::of(&result);

		span.record_outcome(outcome);
		obs::record_flow_outcome(KIND, provider, outcome);

		result
	}
}
