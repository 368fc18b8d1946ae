//! Provider descriptor data structures shared by every provider.
//!
//! A descriptor is the passive half of a provider: identifier, display name, endpoints,
//! default scopes, and the quirks that shape the authorization request. Behavior lives on
//! [`Provider`](crate::provider::Provider) implementations.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::{_prelude::*, auth::ProviderId};

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
	/// Public clients that prove possession via PKCE.
	NoneWithPkce,
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint used by the Authorization Code flow.
	pub authorization: Url,
	/// Token endpoint used for code exchanges.
	pub token: Url,
	/// Fixed user-info endpoint; `None` when the provider derives it per token.
	pub user_info: Option<Url>,
}

/// Immutable provider descriptor consumed by flows and identity resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Registry name of the provider.
	pub id: ProviderId,
	/// Human-readable provider name.
	pub display_name: String,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Scopes requested by default.
	pub scopes: Vec<String>,
	/// Preferred client authentication mechanism.
	pub preferred_client_auth_method: ClientAuthMethod,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Joins the default scopes with the provider's delimiter.
	///
	/// Returns `None` when no scopes are configured so callers can omit the parameter.
	pub fn formatted_scope(&self) -> Option<String> {
		if self.scopes.is_empty() {
			return None;
		}

		let delimiter = self.quirks.scope_delimiter.to_string();

		Some(self.scopes.join(&delimiter))
	}
}
