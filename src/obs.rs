//! Optional observability helpers for handshake stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `sso_handshake.stage` with the `stage`,
//!   `call_site`, and `outcome` fields, plus a warning whenever a profile failure is tolerated.
//! - Enable `metrics` to increment the `sso_handshake_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Handshake stages observed by the authenticator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandshakeStage {
	/// A signed redirect to the identity provider is being issued.
	Redirect,
	/// A returned token is being turned into session state.
	TokenExchange,
	/// An existing session cookie is being reused.
	SessionReuse,
	/// The profile endpoint is being called.
	ProfileFetch,
}
impl HandshakeStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeStage::Redirect => "redirect",
			HandshakeStage::TokenExchange => "token_exchange",
			HandshakeStage::SessionReuse => "session_reuse",
			HandshakeStage::ProfileFetch => "profile_fetch",
		}
	}
}
impl Display for HandshakeStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure, whether propagated or tolerated.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of `stage` on both the span and the metrics counter.
pub fn finish_stage<T, E>(span: &StageSpan, stage: HandshakeStage, result: &Result<T, E>) {
	let outcome = if result.is_ok() { StageOutcome::Success } else { StageOutcome::Failure };

	span.record_outcome(outcome);
	record_stage_outcome(stage, outcome);
}
