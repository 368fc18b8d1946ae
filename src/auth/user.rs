//! Provider-agnostic user record produced by identity resolution.

// self
use crate::{
	_prelude::*,
	auth::{DateTime, TokenSecret},
};

/// Normalized identity emitted by [`Provider::fetch_auth_user`].
///
/// `id` and `username` always carry the same provider identifier. `name` is the provider's
/// best display form, `email` may be empty, and `raw_user` keeps the profile document
/// verbatim (every top-level key, in document order).
///
/// [`Provider::fetch_auth_user`]: crate::provider::Provider::fetch_auth_user
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
	/// Stable provider identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Username; equal to `id`.
	pub username: String,
	/// Primary email address, or an empty string.
	pub email: String,
	/// Unmodified profile document.
	pub raw_user: Map<String, Value>,
	/// Access token used for the resolution.
	pub access_token: TokenSecret,
	/// Refresh token, if one was issued.
	pub refresh_token: Option<TokenSecret>,
	/// Token expiry, or the zero timestamp when unknown.
	pub expiry: DateTime,
}
impl Debug for AuthUser {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthUser")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("username", &self.username)
			.field("email", &self.email)
			.field("raw_user_keys", &self.raw_user.len())
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expiry", &self.expiry)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn user() -> AuthUser {
		AuthUser {
			id: "0000-0001-2345-6789".into(),
			name: "Ada Lovelace".into(),
			username: "0000-0001-2345-6789".into(),
			email: String::new(),
			raw_user: Map::from_iter([("path".to_owned(), json!("/0000-0001-2345-6789/person"))]),
			access_token: TokenSecret::new("access-secret"),
			refresh_token: Some(TokenSecret::new("refresh-secret")),
			expiry: DateTime::default(),
		}
	}

	#[test]
	fn debug_output_hides_token_material() {
		let rendered = format!("{:?}", user());

		assert!(rendered.contains("Ada Lovelace"));
		assert!(!rendered.contains("access-secret"));
		assert!(!rendered.contains("refresh-secret"));
	}

	#[test]
	fn serializes_with_camel_case_keys() {
		let value = serde_json::to_value(user()).expect("User should serialize.");

		assert_eq!(value["rawUser"]["path"], json!("/0000-0001-2345-6789/person"));
		assert_eq!(value["accessToken"], json!("access-secret"));
		assert_eq!(value["expiry"], json!(""));
	}
}
