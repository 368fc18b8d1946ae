//! OAuth token material plus the provider-specific extra fields returned alongside it.

pub mod secret;

// crates.io
use oauth2::ExtraTokenFields;
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Provider-specific fields that arrived next to the standard token response members.
///
/// ORCID, for instance, returns the user's iD under `orcid` and their display name under
/// `name`. Lookups return `None` for absent keys, so callers must handle both cases.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenExtras(BTreeMap<String, Value>);
impl TokenExtras {
	/// Returns the raw JSON value stored under `key`.
	pub fn lookup(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns the value under `key` when it is a JSON string.
	pub fn lookup_str(&self, key: &str) -> Option<&str> {
		self.lookup(key).and_then(Value::as_str)
	}

	/// Inserts or replaces a field, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(key.into(), value.into())
	}

	/// Number of extra fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when the provider returned no extra fields.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over the fields in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}
}
impl ExtraTokenFields for TokenExtras {}
impl FromIterator<(String, Value)> for TokenExtras {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (String, Value)>,
	{
		Self(iter.into_iter().collect())
	}
}

/// Credential set issued by a provider's token endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (usually `bearer`).
	pub token_type: String,
	/// Absolute expiry instant, when the provider reported `expires_in`.
	pub expiry: Option<OffsetDateTime>,
	/// Provider-specific extra fields.
	pub extras: TokenExtras,
}
impl Token {
	/// Creates a bearer token with no refresh secret, expiry, or extras.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			token_type: DEFAULT_TOKEN_TYPE.into(),
			expiry: None,
			extras: TokenExtras::default(),
		}
	}

	/// Sets the refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Overrides the token type.
	pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = token_type.into();

		self
	}

	/// Sets the absolute expiry instant.
	pub fn with_expiry(mut self, instant: OffsetDateTime) -> Self {
		self.expiry = Some(instant);

		self
	}

	/// Adds a provider-specific extra field.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extras.insert(key, value);

		self
	}

	/// Provider-specific extra fields.
	pub fn extras(&self) -> &TokenExtras {
		&self.extras
	}

	/// Builds the `Authorization` header value for resource requests.
	///
	/// `bearer` is canonicalized to `Bearer` and an empty type falls back to it.
	pub fn authorization_value(&self) -> String {
		let scheme = if self.token_type.is_empty()
			|| self.token_type.eq_ignore_ascii_case(DEFAULT_TOKEN_TYPE)
		{
			DEFAULT_TOKEN_TYPE
		} else {
			self.token_type.as_str()
		};

		format!("{scheme} {}", self.access_token.expose())
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("expiry", &self.expiry)
			.field("extras", &self.extras)
			.finish()
	}
}
