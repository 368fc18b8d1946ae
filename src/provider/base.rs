//! Generic provider plumbing: client credentials plus the authenticated user-info fetch.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{HeaderValue, header::AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret},
	error::FetchError,
	http::{ProviderHttpClient, ResponseMetadataSlot},
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// OAuth client registration details supplied by the caller.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret for confidential clients.
	pub client_secret: Option<TokenSecret>,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Option<Url>,
}
impl ClientConfig {
	/// Creates a configuration for `client_id` with no secret or redirect URI.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), ..Default::default() }
	}

	/// Sets the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the redirect URI.
	pub fn with_redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}
}

/// Descriptor, client credentials, and transport shared by concrete providers.
///
/// Authorization helpers live in [`crate::flows`]; this type adds the raw user-info fetch.
pub struct BaseProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Provider metadata.
	pub descriptor: ProviderDescriptor,
	/// Caller-supplied client credentials.
	pub client: ClientConfig,
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
}
impl<C> BaseProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a provider that reuses the caller-provided transport.
	pub fn with_http_client(descriptor: ProviderDescriptor, http_client: impl Into<Arc<C>>) -> Self {
		Self { descriptor, client: ClientConfig::default(), http_client: http_client.into() }
	}

	/// Replaces the client configuration.
	pub fn with_client(mut self, client: ClientConfig) -> Self {
		self.client = client;

		self
	}

	/// Sends `request` with the token's `Authorization` header and returns the body bytes.
	///
	/// Any status of 400 or above is reported as [`FetchError::Status`]. The request is sent
	/// once; retries are left to the caller.
	pub async fn send_user_info_request(
		&self,
		mut request: HttpRequest,
		token: &Token,
	) -> Result<Vec<u8>, FetchError> {
		let authorization =
			HeaderValue::from_str(&token.authorization_value()).map_err(FetchError::request)?;

		request.headers_mut().insert(AUTHORIZATION, authorization);

		let handle = self.http_client.with_metadata(ResponseMetadataSlot::default());
		let response = handle.call(request).await.map_err(FetchError::transport)?;
		let status = response.status().as_u16();

		if status >= 400 {
			return Err(FetchError::status(status, response.body()));
		}

		Ok(response.into_body())
	}
}
#[cfg(feature = "reqwest")]
impl BaseProvider<ReqwestHttpClient> {
	/// Creates a provider backed by a default reqwest transport.
	pub fn new(descriptor: ProviderDescriptor) -> Self {
		Self::with_http_client(descriptor, ReqwestHttpClient::default())
	}
}
impl<C> Debug for BaseProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BaseProvider")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client.client_id)
			.field("client_secret_set", &self.client.client_secret.is_some())
			.finish()
	}
}
