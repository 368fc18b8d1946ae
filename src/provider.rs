//! Provider descriptors, the [`Provider`] capability, and the built-in providers.
//!
//! `descriptor` holds validated passive metadata (endpoints, scopes, quirks). `base` pairs a
//! descriptor with client credentials and a transport and implements everything that is not
//! provider-specific. `orcid` layers ORCID identity resolution on top, and `registry` maps
//! provider names to factories.

pub mod base;
pub mod descriptor;
pub mod orcid;
pub mod registry;

pub use base::*;
pub use descriptor::*;
pub use orcid::*;
pub use registry::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthUser, Token},
	flows::AuthorizationSession,
};

/// Boxed future returned by [`Provider`] operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Capability shared by every identity provider.
///
/// The trait is object safe so providers can be stored as `Box<dyn Provider>` in a
/// [`ProviderRegistry`]. Implementations hold no per-call mutable state, which lets one
/// instance serve concurrent calls.
pub trait Provider: Send + Sync {
	/// Passive provider metadata.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Client credentials used for the authorization flow.
	fn client(&self) -> &ClientConfig;

	/// Mutable access so callers can attach credentials after creating the provider.
	fn client_mut(&mut self) -> &mut ClientConfig;

	/// Builds the authorize URL plus the state and PKCE material to keep until the redirect.
	fn start_authorization(&self) -> Result<AuthorizationSession>;

	/// Exchanges an authorization code for a [`Token`].
	fn exchange_code<'a>(
		&'a self,
		session: &'a AuthorizationSession,
		code: &'a str,
	) -> ProviderFuture<'a, Token>;

	/// Resolves `token` into a normalized [`AuthUser`].
	fn fetch_auth_user<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, AuthUser>;
}
