//! Handshake states and per-request outcomes.

// self
use crate::{_prelude::*, auth::SessionState, error::ProfileFetchError, redirect::RedirectTarget};

/// States a request moves through inside one handshake cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandshakeState {
	/// No session cookie and no returned token.
	NoSession,
	/// A token came back from the identity provider and is being resolved.
	TokenReceivedPendingProfile,
	/// Session state exists; the request continues.
	Authenticated,
	/// The client must be sent to the identity provider. Nothing is persisted.
	RedirectRequired,
}
impl HandshakeState {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeState::NoSession => "no_session",
			HandshakeState::TokenReceivedPendingProfile => "token_received_pending_profile",
			HandshakeState::Authenticated => "authenticated",
			HandshakeState::RedirectRequired => "redirect_required",
		}
	}
}
impl Display for HandshakeState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What the host should do with the request.
///
/// Failures are reported through the `Err` side of
/// [`Authenticator::authenticate`](crate::handshake::Authenticator::authenticate).
#[derive(Debug)]
pub enum AuthOutcome {
	/// Send the client to the identity provider.
	Redirect {
		/// Signed redirect destination.
		target: RedirectTarget,
	},
	/// Continue handling the request with these credentials.
	Continue {
		/// Session state backing the request.
		credentials: SessionState,
		/// `true` when the state is new and the host must write the session cookie.
		issued: bool,
		/// Profile failure tolerated by policy; the profile is empty when set.
		profile_error: Option<ProfileFetchError>,
	},
}
impl AuthOutcome {
	/// Terminal state of this request cycle.
	pub fn state(&self) -> HandshakeState {
		match self {
			AuthOutcome::Redirect { .. } => HandshakeState::RedirectRequired,
			AuthOutcome::Continue { .. } => HandshakeState::Authenticated,
		}
	}

	/// Redirect target, if the client must be redirected.
	pub fn redirect_target(&self) -> Option<&RedirectTarget> {
		match self {
			AuthOutcome::Redirect { target } => Some(target),
			AuthOutcome::Continue { .. } => None,
		}
	}

	/// Credentials, if the request continues.
	pub fn credentials(&self) -> Option<&SessionState> {
		match self {
			AuthOutcome::Continue { credentials, .. } => Some(credentials),
			AuthOutcome::Redirect { .. } => None,
		}
	}

	/// Session state the host must persist, if any.
	pub fn state_to_persist(&self) -> Option<&SessionState> {
		match self {
			AuthOutcome::Continue { credentials, issued: true, .. } => Some(credentials),
			_ => None,
		}
	}
}
