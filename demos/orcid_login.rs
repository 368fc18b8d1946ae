//! Signs a user in with ORCID: prints the authorize URL, waits for the redirect parameters on
//! stdin, exchanges the code, and prints the resolved identity.
//!
//! ```sh
//! ORCID_CLIENT_ID=APP-... ORCID_CLIENT_SECRET=... \
//! ORCID_REDIRECT_URI=https://app.example.com/callback \
//! cargo run --example orcid_login
//! ```

// std
use std::{env, io};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_identity::{
	provider::{ClientConfig, NAME_ORCID, ProviderRegistry},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut provider = ProviderRegistry::global().create(NAME_ORCID)?;

	*provider.client_mut() = ClientConfig::new(env::var("ORCID_CLIENT_ID")?)
		.with_client_secret(env::var("ORCID_CLIENT_SECRET")?)
		.with_redirect_uri(Url::parse(&env::var("ORCID_REDIRECT_URI")?)?);

	let session = provider.start_authorization()?;

	println!("Send your user to {}.", &session.authorize_url);
	println!("Paste the `state` and `code` query values from the redirect, one per line:");

	let mut state = String::new();
	let mut code = String::new();

	io::stdin().read_line(&mut state)?;
	io::stdin().read_line(&mut code)?;
	session.validate_state(state.trim())?;

	let token = provider.exchange_code(&session, code.trim()).await?;
	let user = provider.fetch_auth_user(&token).await?;

	if user.id.is_empty() {
		return Err(eyre!("ORCID returned an empty identifier."));
	}

	println!("Signed in as {} ({}).", user.name, user.id);
	println!("Email: {}.", if user.email.is_empty() { "<private>" } else { &user.email });
	println!("Token expires at {}.", user.expiry);

	Ok(())
}
