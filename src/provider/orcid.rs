//! ORCID provider: authorization-code + PKCE login and token-to-identity resolution.
//!
//! ORCID does not expose a fixed user-info endpoint. The token response carries the user's
//! iD under the `orcid` extra field, and the public profile lives at
//! `https://pub.orcid.org/v3.0/<iD>/person`. Resolution reads that iD, fetches the profile
//! once, and folds the optional name and email records into an [`AuthUser`].

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{AuthUser, DateTime, ProviderId, Token},
	error::{ConfigError, FetchError, MalformedResponseError},
	flows::AuthorizationSession,
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{
		BaseProvider, ClientAuthMethod, ClientConfig, Provider, ProviderDescriptor, ProviderFuture,
		ProviderQuirks,
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Registry name of the ORCID provider.
pub const NAME_ORCID: &str = "ORCID";
/// Token extra field that carries the ORCID iD.
pub const ORCID_IDENTIFIER_KEY: &str = "orcid";
/// Base URL of the public ORCID v3.0 API.
pub const ORCID_PROFILE_BASE: &str = "https://pub.orcid.org/v3.0/";

const ORCID_AUTHORIZATION_URL: &str = "https://orcid.org/oauth/authorize";
const ORCID_TOKEN_URL: &str = "https://orcid.org/oauth/token";
const ORCID_SCOPE_AUTHENTICATE: &str = "/authenticate";
const JSON_MEDIA_TYPE: &str = "application/json";

/// ORCID provider backed by the default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestOrcidProvider = OrcidProvider<ReqwestHttpClient>;

/// Builds the ORCID descriptor: PKCE required, `/authenticate` scope, no fixed user-info URL.
pub fn orcid_descriptor() -> Result<ProviderDescriptor, ConfigError> {
	let id = ProviderId::new(NAME_ORCID)?;
	let authorization = Url::parse(ORCID_AUTHORIZATION_URL)
		.map_err(|source| ConfigError::InvalidDescriptor { source })?;
	let token =
		Url::parse(ORCID_TOKEN_URL).map_err(|source| ConfigError::InvalidDescriptor { source })?;
	let descriptor = ProviderDescriptor::builder(id)
		.display_name(NAME_ORCID)
		.authorization_endpoint(authorization)
		.token_endpoint(token)
		.scope(ORCID_SCOPE_AUTHENTICATE)
		.preferred_client_auth_method(ClientAuthMethod::ClientSecretPost)
		.quirks(ProviderQuirks { pkce_required: true, ..Default::default() })
		.build()?;

	Ok(descriptor)
}

/// Identity provider for ORCID.
pub struct OrcidProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	base: BaseProvider<C>,
	profile_base: Url,
}
impl<C> OrcidProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates an ORCID provider with the default descriptor on top of `http_client`.
	pub fn with_http_client(http_client: impl Into<Arc<C>>) -> Result<Self> {
		Self::from_base(BaseProvider::with_http_client(orcid_descriptor()?, http_client))
	}

	/// Wraps an existing base provider, e.g. one pointing at the ORCID sandbox.
	pub fn from_base(base: BaseProvider<C>) -> Result<Self> {
		let profile_base = Url::parse(ORCID_PROFILE_BASE)
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;

		Ok(Self { base, profile_base })
	}

	/// Overrides the profile API base (sandbox or member API).
	pub fn with_profile_base(mut self, url: Url) -> Result<Self, ConfigError> {
		if url.cannot_be_a_base() {
			return Err(ConfigError::InvalidProfileBase { url: url.to_string() });
		}

		self.profile_base = url;

		Ok(self)
	}

	/// Replaces the client configuration.
	pub fn with_client(mut self, client: ClientConfig) -> Self {
		self.base.client = client;

		self
	}

	/// Profile API base the per-user endpoint is derived from.
	pub fn profile_base(&self) -> &Url {
		&self.profile_base
	}

	/// Underlying generic provider.
	pub fn base(&self) -> &BaseProvider<C> {
		&self.base
	}

	/// Derives `<profile base>/<orcid>/person`, appending the iD as one encoded path segment.
	pub fn profile_endpoint(&self, orcid: &str) -> Result<Url, ConfigError> {
		let mut url = self.profile_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidProfileBase { url: self.profile_base.to_string() })?
			.pop_if_empty()
			.push(orcid)
			.push("person");

		Ok(url)
	}

	/// Resolves `token` into an [`AuthUser`] via the ORCID public profile API.
	///
	/// Fails with [`Error::MissingIdentifier`] before any network call when the token lacks
	/// a non-empty `orcid` string. Transport failures and error statuses surface as
	/// [`Error::Fetch`]; a body that is neither an object nor `null`, or that does not fit the
	/// person record, surfaces as [`Error::MalformedResponse`].
	pub async fn fetch_auth_user(&self, token: &Token) -> Result<AuthUser> {
		const KIND: FlowKind = FlowKind::UserInfo;

		let provider = &self.base.descriptor.id;
		let span = FlowSpan::new(KIND, provider, "fetch_auth_user");

		obs::record_flow_outcome(KIND, provider, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let orcid = token
					.extras()
					.lookup_str(ORCID_IDENTIFIER_KEY)
					.filter(|value| !value.is_empty())
					.ok_or(Error::MissingIdentifier { key: ORCID_IDENTIFIER_KEY })?;
				let endpoint = self.profile_endpoint(orcid)?;
				let request = Request::builder()
					.method(Method::GET)
					.uri(endpoint.as_str())
					.header(ACCEPT, JSON_MEDIA_TYPE)
					.header(CONTENT_TYPE, JSON_MEDIA_TYPE)
					.body(Vec::new())
					.map_err(FetchError::request)?;
				let body = self.base.send_user_info_request(request, token).await?;
				// A `null` document is an empty profile.
				let raw_user = serde_json::from_slice::<Option<Map<String, Value>>>(&body)
					.map_err(|source| MalformedResponseError::RawProfile { source })?
					.unwrap_or_default();
				let person = serde_path_to_error::deserialize::<_, Option<OrcidPerson>>(
					&mut serde_json::Deserializer::from_slice(&body),
				)
				.map_err(|source| MalformedResponseError::Projection { source })?
				.unwrap_or_default();

				#[cfg(feature = "tracing")]
				tracing::debug!(keys = raw_user.len(), "orcid profile fetched");

				Ok(AuthUser {
					id: orcid.to_owned(),
					name: display_name(person.name.as_ref()),
					username: orcid.to_owned(),
					email: primary_email(person.emails.as_ref()),
					raw_user,
					access_token: token.access_token.clone(),
					refresh_token: token.refresh_token.clone(),
					expiry: token
						.expiry
						.and_then(|instant| DateTime::try_from(instant).ok())
						.unwrap_or_default(),
				})
			})
			.await;

		let outcome = FlowOutcome::of(&result);

		span.record_outcome(outcome);
		obs::record_flow_outcome(KIND, provider, outcome);

		result
	}
}
#[cfg(feature = "reqwest")]
impl OrcidProvider<ReqwestHttpClient> {
	/// Creates an ORCID provider backed by a default reqwest transport.
	pub fn new() -> Result<Self> {
		Self::with_http_client(ReqwestHttpClient::default())
	}
}
impl<C> Provider for OrcidProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn descriptor(&self) -> &ProviderDescriptor {
		&self.base.descriptor
	}

	fn client(&self) -> &ClientConfig {
		&self.base.client
	}

	fn client_mut(&mut self) -> &mut ClientConfig {
		&mut self.base.client
	}

	fn start_authorization(&self) -> Result<AuthorizationSession> {
		self.base.start_authorization()
	}

	fn exchange_code<'a>(
		&'a self,
		session: &'a AuthorizationSession,
		code: &'a str,
	) -> ProviderFuture<'a, Token> {
		Box::pin(self.base.exchange_code(session, code))
	}

	fn fetch_auth_user<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, AuthUser> {
		Box::pin(OrcidProvider::fetch_auth_user(self, token))
	}
}
impl<C> Debug for OrcidProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OrcidProvider")
			.field("base", &self.base)
			.field("profile_base", &self.profile_base.as_str())
			.finish()
	}
}

// Every level is optional; JSON `null` and absent members both read as empty.
#[derive(Debug, Default, Deserialize)]
struct OrcidPerson {
	name: Option<OrcidName>,
	emails: Option<OrcidEmails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct OrcidName {
	given_names: Option<OrcidValue>,
	family_name: Option<OrcidValue>,
	credit_name: Option<OrcidValue>,
}

#[derive(Debug, Deserialize)]
struct OrcidValue {
	value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrcidEmails {
	email: Option<Vec<Option<OrcidEmail>>>,
}

#[derive(Debug, Deserialize)]
struct OrcidEmail {
	email: Option<String>,
}

fn display_name(name: Option<&OrcidName>) -> String {
	let Some(name) = name else {
		return String::new();
	};
	let credit = value_of(name.credit_name.as_ref());

	if !credit.is_empty() {
		return credit.to_owned();
	}

	let given = value_of(name.given_names.as_ref());
	let family = value_of(name.family_name.as_ref());

	if family.is_empty() { given.to_owned() } else { format!("{given} {family}") }
}

fn primary_email(emails: Option<&OrcidEmails>) -> String {
	emails
		.and_then(|emails| emails.email.as_ref())
		.and_then(|list| list.first())
		.and_then(|first| first.as_ref())
		.and_then(|record| record.email.clone())
		.unwrap_or_default()
}

fn value_of(field: Option<&OrcidValue>) -> &str {
	field.and_then(|field| field.value.as_deref()).unwrap_or_default()
}
