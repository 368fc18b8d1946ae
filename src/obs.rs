//! Observability for sign-in and identity resolution.
//!
//! # Feature Flags
//!
//! - `tracing`: every provider operation runs inside an `oauth2_identity.flow` span with
//!   `flow`, `provider`, `stage`, and (once settled) `outcome` fields.
//! - `metrics`: the `oauth2_identity_flow_total` counter is incremented on entry and again on
//!   success or failure, labeled by `flow`, `provider`, and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization Code + PKCE helpers (authorize URL and code exchange).
	AuthorizationCode,
	/// Token-to-identity resolution against a profile endpoint.
	UserInfo,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::AuthorizationCode => "authorization_code",
			FlowKind::UserInfo => "user_info",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a provider operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Settled outcome of a finished operation.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::UserInfo.to_string(), "user_info");
		assert_eq!(FlowKind::AuthorizationCode.as_str(), "authorization_code");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}

	#[test]
	fn settled_outcome_follows_the_result() {
		let missing: Result<(), Error> = Err(Error::MissingIdentifier { key: "orcid" });

		assert_eq!(FlowOutcome::of(&Ok::<_, Error>("0000-0001-2345-6789")), FlowOutcome::Success);
		assert_eq!(FlowOutcome::of(&missing), FlowOutcome::Failure);
	}
}
