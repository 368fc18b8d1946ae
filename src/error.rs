//! Crate-level error types shared across flows, providers, and the registry.

// self
use crate::{_prelude::*, auth::IdentifierError, provider::ProviderDescriptorError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Identity resolution only ever yields [`Error::MissingIdentifier`], [`Error::Fetch`],
/// [`Error::MalformedResponse`], or [`Error::Config`]; the remaining variants belong to the
/// authorization-code exchange and the provider registry.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The profile or token endpoint could not be reached or answered with an error status.
	#[error(transparent)]
	Fetch(#[from] FetchError),
	/// The profile endpoint returned a body that does not match the expected document.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponseError),

	/// The token does not carry the identifier needed to address the profile endpoint.
	#[error("Token does not carry a usable `{key}` identifier.")]
	MissingIdentifier {
		/// Extra-field key that was looked up.
		key: &'static str,
	},
	/// No provider is registered under the requested name.
	#[error("No provider is registered under `{name}`.")]
	UnknownProvider {
		/// Requested provider name.
		name: String,
	},
	/// Provider rejected the grant (e.g., bad or reused authorization code).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint answered with an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] ProviderDescriptorError),
	/// Provider or registry name failed validation.
	#[error("Provider identifier is invalid.")]
	InvalidIdentifier(#[from] IdentifierError),
	/// Provider descriptor contains a URL the OAuth client rejects.
	#[error("Descriptor contains an invalid URL.")]
	InvalidDescriptor {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// The authorization-code flow needs a redirect URI on the client configuration.
	#[error("Client configuration is missing a redirect URI.")]
	MissingRedirectUri,
	/// Profile base URL cannot carry path segments.
	#[error("Profile base URL cannot be used as a base: {url}.")]
	InvalidProfileBase {
		/// Offending URL.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while fetching a document from a provider endpoint.
///
/// Values are propagated unchanged; retry policy belongs to the caller.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// The outbound request could not be assembled.
	#[error("Request to the provider could not be built.")]
	Request {
		/// Builder or header failure.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Provider answered with an error status.
	#[error("Provider responded with HTTP {status}.")]
	Status {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Truncated preview of the response body.
		body_preview: String,
	},
}
impl FetchError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Wraps a request construction failure.
	pub fn request(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Request { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Builds a status failure, keeping at most 256 characters of the body.
	pub fn status(status: u16, body: &[u8]) -> Self {
		Self::Status { status, body_preview: truncate_preview(&String::from_utf8_lossy(body)) }
	}
}

/// Profile body could not be interpreted.
#[derive(Debug, ThisError)]
pub enum MalformedResponseError {
	/// Body is not a JSON object.
	#[error("Profile response is not a JSON object.")]
	RawProfile {
		/// JSON decoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// Body does not fit the typed profile projection.
	#[error("Profile response does not match the expected shape at `{}`.", .source.path())]
	Projection {
		/// Structured decoding failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= FetchError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(FetchError::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_errors_truncate_long_bodies() {
		let body = "x".repeat(FetchError::BODY_PREVIEW_LIMIT + 10);
		let FetchError::Status { status, body_preview } = FetchError::status(502, body.as_bytes())
		else {
			panic!("Status constructor must yield the status variant.");
		};

		assert_eq!(status, 502);
		assert_eq!(body_preview.chars().count(), FetchError::BODY_PREVIEW_LIMIT + 1);
		assert!(body_preview.ends_with('…'));
	}

	#[test]
	fn short_bodies_are_kept_verbatim() {
		let FetchError::Status { body_preview, .. } = FetchError::status(404, b"not found") else {
			panic!("Status constructor must yield the status variant.");
		};

		assert_eq!(body_preview, "not found");
	}
}
