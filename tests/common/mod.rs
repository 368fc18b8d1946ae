//! Fixtures shared by the reqwest-backed integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::prelude::*;
// self
use oauth2_identity::{
	auth::{ProviderId, Token},
	provider::{
		BaseProvider, ClientAuthMethod, ClientConfig, OrcidProvider, ProviderDescriptor,
		ProviderEndpoints, ProviderQuirks, ReqwestOrcidProvider,
	},
	url::Url,
};

pub const CLIENT_ID: &str = "APP-IT0000000001";
pub const CLIENT_SECRET: &str = "secret-it";
pub const ADA_ORCID: &str = "0000-0001-2345-6789";

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("Fixture URL should parse.")
}

/// Descriptor pointing at the mock server.
///
/// Assembled directly because the builder only accepts HTTPS endpoints.
pub fn mock_descriptor(server: &MockServer) -> ProviderDescriptor {
	ProviderDescriptor {
		id: ProviderId::new("mock-orcid").expect("Mock provider id should be valid."),
		display_name: "Mock ORCID".into(),
		endpoints: ProviderEndpoints {
			authorization: url(&server.url("/oauth/authorize")),
			token: url(&server.url("/oauth/token")),
			user_info: None,
		},
		scopes: vec!["/authenticate".into()],
		preferred_client_auth_method: ClientAuthMethod::ClientSecretPost,
		quirks: ProviderQuirks { pkce_required: true, ..Default::default() },
	}
}

pub fn client_config() -> ClientConfig {
	ClientConfig::new(CLIENT_ID)
		.with_client_secret(CLIENT_SECRET)
		.with_redirect_uri(url("https://app.example.com/callback"))
}

/// ORCID provider whose token and profile endpoints live on `server`.
pub fn orcid_provider(server: &MockServer) -> ReqwestOrcidProvider {
	let base = BaseProvider::new(mock_descriptor(server)).with_client(client_config());

	OrcidProvider::from_base(base)
		.expect("ORCID provider should wrap the mock base.")
		.with_profile_base(url(&server.url("/v3.0/")))
		.expect("Mock profile base should be accepted.")
}

pub fn orcid_token(orcid: &str) -> Token {
	Token::new("access-it").with_refresh_token("refresh-it").with_extra("orcid", orcid)
}

pub fn profile_path(orcid: &str) -> String {
	format!("/v3.0/{orcid}/person")
}
