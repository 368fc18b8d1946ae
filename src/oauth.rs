//! OAuth client facade shared by every provider's code exchange.
//!
//! [`BasicFacade`] wraps an `oauth2` client whose token response captures provider-specific
//! extra fields into [`TokenExtras`], then maps the response into the crate's [`Token`].

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, PkceCodeVerifier, RedirectUrl, RequestTokenError, StandardRevocableToken,
	StandardTokenResponse, TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
		BasicTokenType,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenExtras},
	error::{ConfigError, FetchError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{ClientAuthMethod, ClientConfig, ProviderDescriptor},
};

/// Token response that keeps unknown members as [`TokenExtras`].
pub type ExtrasTokenResponse = StandardTokenResponse<TokenExtras, BasicTokenType>;

type ConfiguredClient = oauth2::Client<
	BasicErrorResponse,
	ExtrasTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;
type ExtrasRequestTokenError<E> = RequestTokenError<HttpClientError<E>, BasicErrorResponse>;

/// `oauth2` client bound to one provider descriptor and transport.
pub struct BasicFacade<C>
where
	C: ?Sized + ProviderHttpClient,
{
	oauth_client: ConfiguredClient,
	http_client: Arc<C>,
}
impl<C> BasicFacade<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Builds a facade from descriptor endpoints and client credentials.
	///
	/// The client secret is dropped for [`ClientAuthMethod::NoneWithPkce`] descriptors and sent
	/// in the request body for [`ClientAuthMethod::ClientSecretPost`].
	pub fn from_provider(
		descriptor: &ProviderDescriptor,
		client: &ClientConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let auth_url = AuthUrl::new(descriptor.endpoints.authorization.to_string())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;
		let token_url = TokenUrl::new(descriptor.endpoints.token.to_string())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;
		let secret =
			if matches!(descriptor.preferred_client_auth_method, ClientAuthMethod::NoneWithPkce) {
				None
			} else {
				client.client_secret.as_ref().map(|value| ClientSecret::new(value.expose().to_owned()))
			};
		let mut oauth_client = oauth2::Client::new(ClientId::new(client.client_id.clone()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if let Some(secret) = secret {
			oauth_client = oauth_client.set_client_secret(secret);
		}
		if matches!(descriptor.preferred_client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self { oauth_client, http_client: http_client.into() })
	}

	/// Exchanges an authorization code (plus optional PKCE verifier) for a [`Token`].
	pub async fn exchange_authorization_code(
		&self,
		code: &str,
		pkce_verifier: Option<&str>,
		redirect_uri: &Url,
	) -> Result<Token> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let redirect_url = RedirectUrl::new(redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidRedirect { source })?;
		let mut request = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.set_redirect_uri(Cow::Owned(redirect_url));

		if let Some(verifier) = pkce_verifier {
			request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_owned()));
		}

		let response = request
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		Ok(map_token_response(response, OffsetDateTime::now_utc()))
	}
}
impl<C> Debug for BasicFacade<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicFacade")
			.field("client_id", &self.oauth_client.client_id().as_str())
			.finish_non_exhaustive()
	}
}

fn map_token_response(response: ExtrasTokenResponse, issued_at: OffsetDateTime) -> Token {
	let mut token = Token::new(response.access_token().secret().to_owned())
		.with_token_type(response.token_type().as_ref());

	if let Some(refresh) = response.refresh_token() {
		token = token.with_refresh_token(refresh.secret().to_owned());
	}
	if let Some(expiry) = response
		.expires_in()
		.and_then(|ttl| Duration::try_from(ttl).ok())
		.and_then(|ttl| issued_at.checked_add(ttl))
	{
		token = token.with_expiry(expiry);
	}

	token.extras = response.extra_fields().clone();

	token
}

fn map_request_error<E>(meta: Option<ResponseMetadata>, err: ExtrasRequestTokenError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => FetchError::transport(error).into(),
		RequestTokenError::Parse(source, _body) => Error::TokenResponseParse { source, status },
		RequestTokenError::Other(message) => Error::TokenEndpoint { message, status },
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> Error {
	let code = response.error().as_ref();
	let message = match response.error_description() {
		Some(description) => format!("{code}: {description}"),
		None => code.to_owned(),
	};

	if code.eq_ignore_ascii_case("invalid_grant") || code.eq_ignore_ascii_case("access_denied") {
		Error::InvalidGrant { reason: message }
	} else if code.eq_ignore_ascii_case("invalid_client")
		|| code.eq_ignore_ascii_case("unauthorized_client")
	{
		Error::InvalidClient { reason: message }
	} else {
		Error::TokenEndpoint { message, status }
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn error_response(body: &str) -> BasicErrorResponse {
		serde_json::from_str(body).expect("Error response fixture should deserialize.")
	}

	#[test]
	fn token_response_maps_expiry_and_extras() {
		let response: ExtrasTokenResponse = serde_json::from_str(
			r#"{
				"access_token": "access-1",
				"token_type": "bearer",
				"refresh_token": "refresh-1",
				"expires_in": 3600,
				"orcid": "0000-0001-2345-6789"
			}"#,
		)
		.expect("Token response fixture should deserialize.");
		let token = map_token_response(response, datetime!(2025-01-01 00:00 UTC));

		assert_eq!(token.access_token.expose(), "access-1");
		assert_eq!(token.refresh_token.as_ref().map(|secret| secret.expose()), Some("refresh-1"));
		assert_eq!(token.expiry, Some(datetime!(2025-01-01 01:00 UTC)));
		assert_eq!(token.extras().lookup_str("orcid"), Some("0000-0001-2345-6789"));
		assert_eq!(token.authorization_value(), "Bearer access-1");
	}

	#[test]
	fn token_response_without_expires_in_has_no_expiry() {
		let response: ExtrasTokenResponse =
			serde_json::from_str(r#"{"access_token":"a","token_type":"bearer"}"#)
				.expect("Minimal token response should deserialize.");
		let token = map_token_response(response, OffsetDateTime::now_utc());

		assert!(token.expiry.is_none());
		assert!(token.extras().is_empty());
	}

	#[test]
	fn server_errors_are_classified() {
		let grant = map_server_response_error(
			error_response(r#"{"error":"invalid_grant","error_description":"Code reused"}"#),
			Some(400),
		);
		let client =
			map_server_response_error(error_response(r#"{"error":"invalid_client"}"#), Some(401));
		let other =
			map_server_response_error(error_response(r#"{"error":"server_error"}"#), Some(500));

		assert!(matches!(grant, Error::InvalidGrant { ref reason } if reason.contains("Code reused")));
		assert!(matches!(client, Error::InvalidClient { .. }));
		assert!(matches!(other, Error::TokenEndpoint { status: Some(500), .. }));
	}
}
