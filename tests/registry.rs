// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// self
use oauth2_identity::{
	auth::{AuthUser, DateTime, ProviderId, Token},
	error::Error,
	flows::AuthorizationSession,
	provider::{
		ClientConfig, Provider, ProviderDescriptor, ProviderEndpoints, ProviderFuture,
		ProviderQuirks, ProviderRegistry,
	},
	url::Url,
};

/// Provider that answers from the token alone, used to exercise the registry contract.
struct StaticProvider {
	descriptor: ProviderDescriptor,
	client: ClientConfig,
}
impl StaticProvider {
	fn new(name: &str) -> Self {
		let descriptor = ProviderDescriptor {
			id: ProviderId::new(name).expect("Static provider id should be valid."),
			display_name: name.to_owned(),
			endpoints: ProviderEndpoints {
				authorization: Url::parse("https://static.test/authorize")
					.expect("Static URL should parse."),
				token: Url::parse("https://static.test/token").expect("Static URL should parse."),
				user_info: None,
			},
			scopes: Vec::new(),
			preferred_client_auth_method: Default::default(),
			quirks: ProviderQuirks::default(),
		};

		Self { descriptor, client: ClientConfig::default() }
	}
}
impl Provider for StaticProvider {
	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn client(&self) -> &ClientConfig {
		&self.client
	}

	fn client_mut(&mut self) -> &mut ClientConfig {
		&mut self.client
	}

	fn start_authorization(&self) -> Result<AuthorizationSession, Error> {
		Err(Error::InvalidGrant { reason: "static providers skip authorization".into() })
	}

	fn exchange_code<'a>(
		&'a self,
		_session: &'a AuthorizationSession,
		code: &'a str,
	) -> ProviderFuture<'a, Token> {
		Box::pin(async move { Ok(Token::new(code)) })
	}

	fn fetch_auth_user<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, AuthUser> {
		Box::pin(async move {
			Ok(AuthUser {
				id: "static".into(),
				name: self.descriptor.display_name.clone(),
				username: "static".into(),
				email: String::new(),
				raw_user: Default::default(),
				access_token: token.access_token.clone(),
				refresh_token: None,
				expiry: DateTime::default(),
			})
		})
	}
}

#[test]
fn register_replaces_and_reports_previous_entries() {
	let registry = ProviderRegistry::empty();

	assert!(
		!registry
			.register("static", || Ok(Box::new(StaticProvider::new("static"))))
			.expect("Valid names should register.")
	);
	assert!(
		registry
			.register("static", || Ok(Box::new(StaticProvider::new("static-v2"))))
			.expect("Valid names should register.")
	);

	let provider = registry.create("static").expect("Registered provider should be created.");

	assert_eq!(provider.descriptor().display_name, "static-v2");
	assert_eq!(registry.names(), vec!["static".to_owned()]);
}

#[test]
fn every_create_runs_the_factory_for_a_fresh_instance() {
	let registry = ProviderRegistry::empty();
	let built = Arc::new(AtomicUsize::new(0));
	let counter = built.clone();

	registry
		.register("static", move || {
			counter.fetch_add(1, Ordering::SeqCst);

			Ok(Box::new(StaticProvider::new("static")))
		})
		.expect("Valid names should register.");

	let mut first = registry.create("static").expect("First create should succeed.");
	let second = registry.create("static").expect("Second create should succeed.");

	first.client_mut().client_id = "configured".into();

	assert_eq!(built.load(Ordering::SeqCst), 2);
	assert_eq!(first.client().client_id, "configured");
	assert!(second.client().client_id.is_empty());
}

#[test]
fn clones_share_registrations() {
	let registry = ProviderRegistry::empty();
	let clone = registry.clone();

	clone
		.register("static", || Ok(Box::new(StaticProvider::new("static"))))
		.expect("Valid names should register.");

	assert!(registry.contains("static"));
	assert!(matches!(registry.create("missing"), Err(Error::UnknownProvider { .. })));
}

#[tokio::test]
async fn registered_providers_resolve_through_trait_objects() {
	let registry = ProviderRegistry::empty();

	registry
		.register("static", || Ok(Box::new(StaticProvider::new("Static"))))
		.expect("Valid names should register.");

	let provider = registry.create("static").expect("Registered provider should be created.");
	let user = provider.fetch_auth_user(&Token::new("abc")).await.expect("Static user resolves.");

	assert_eq!(user.name, "Static");
	assert_eq!(user.access_token.expose(), "abc");
}

#[cfg(feature = "reqwest")]
#[test]
fn default_registry_exposes_orcid() {
	let registry = ProviderRegistry::default();
	let mut provider = registry.create("ORCID").expect("ORCID should be registered by default.");

	*provider.client_mut() = ClientConfig::new("APP-123")
		.with_redirect_uri(Url::parse("https://app.test/cb").expect("Redirect should parse."));

	let session = provider.start_authorization().expect("ORCID authorization should start.");

	assert!(session.authorize_url.as_str().starts_with("https://orcid.org/oauth/authorize?"));
	assert!(session.code_challenge().is_some());
}
