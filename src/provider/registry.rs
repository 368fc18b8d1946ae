//! Name-keyed provider factories.
//!
//! Every [`ProviderRegistry::create`] call runs the factory again, so each caller gets a
//! fresh provider it can configure with [`Provider::client_mut`].

// std
use std::sync::OnceLock;
// self
use crate::{_prelude::*, auth::ProviderId, error::ConfigError, provider::Provider};

/// Factory that builds a fresh provider instance.
pub type ProviderFactory = Arc<dyn Fn() -> Result<Box<dyn Provider>> + Send + Sync>;

/// Thread-safe map from provider name to factory.
///
/// Cloning the registry shares the underlying map.
#[derive(Clone)]
pub struct ProviderRegistry {
	factories: Arc<RwLock<BTreeMap<ProviderId, ProviderFactory>>>,
}
impl ProviderRegistry {
	/// Creates a registry with no providers.
	pub fn empty() -> Self {
		Self { factories: Default::default() }
	}

	/// Process-wide registry seeded with the built-in providers.
	pub fn global() -> &'static ProviderRegistry {
		static GLOBAL: OnceLock<ProviderRegistry> = OnceLock::new();

		GLOBAL.get_or_init(ProviderRegistry::default)
	}

	/// Registers `factory` under `name`, returning `true` when it replaced an existing entry.
	pub fn register<F>(&self, name: &str, factory: F) -> Result<bool>
	where
		F: 'static + Fn() -> Result<Box<dyn Provider>> + Send + Sync,
	{
		let id = ProviderId::new(name).map_err(ConfigError::from)?;

		Ok(self.factories.write().insert(id, Arc::new(factory)).is_some())
	}

	/// Builds a new provider registered under `name`.
	pub fn create(&self, name: &str) -> Result<Box<dyn Provider>> {
		let factory = self
			.factories
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| Error::UnknownProvider { name: name.to_owned() })?;

		factory()
	}

	/// Returns true when a provider is registered under `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.factories.read().contains_key(name)
	}

	/// Registered names in lexicographic order.
	pub fn names(&self) -> Vec<String> {
		self.factories.read().keys().map(ToString::to_string).collect()
	}
}
impl Default for ProviderRegistry {
	/// Registry containing the built-in providers (ORCID when `reqwest` is enabled).
	fn default() -> Self {
		let registry = Self::empty();

		#[cfg(feature = "reqwest")]
		if let Ok(id) = ProviderId::new(crate::provider::NAME_ORCID) {
			let factory: ProviderFactory = Arc::new(|| -> Result<Box<dyn Provider>> {
				Ok(Box::new(crate::provider::ReqwestOrcidProvider::new()?))
			});

			registry.factories.write().insert(id, factory);
		}

		registry
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistry").field("names", &self.names()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unknown_names_are_reported() {
		let registry = ProviderRegistry::empty();
		let err = registry.create("github").err().expect("Empty registry must not create providers.");

		assert!(matches!(err, Error::UnknownProvider { ref name } if name == "github"));
		assert!(!registry.contains("github"));
		assert!(registry.names().is_empty());
	}

	#[test]
	fn invalid_names_are_rejected() {
		let err = ProviderRegistry::empty()
			.register("my provider", || Err(Error::UnknownProvider { name: "never".into() }))
			.expect_err("Whitespace names must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidIdentifier(_))));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn default_registry_creates_orcid() {
		let registry = ProviderRegistry::default();
		let provider = registry.create("ORCID").expect("ORCID should be registered by default.");

		assert_eq!(registry.names(), vec!["ORCID".to_owned()]);
		assert_eq!(provider.descriptor().display_name, "ORCID");
		assert!(ProviderRegistry::global().contains("ORCID"));
	}
}
