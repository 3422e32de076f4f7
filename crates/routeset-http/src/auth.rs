//! Authentication state consumed by permission checks.

/// Who is making the request, as far as permission hooks care.
///
/// Authentication itself happens elsewhere; some upstream layer stores an
/// `AuthState` in the request [`Extensions`](crate::Extensions) and
/// permission policies read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
	pub user_id: Option<i64>,
	pub is_authenticated: bool,
	pub is_admin: bool,
	pub is_active: bool,
}

impl AuthState {
	/// State for a signed-in user.
	pub fn authenticated(user_id: i64, is_admin: bool, is_active: bool) -> Self {
		Self {
			user_id: Some(user_id),
			is_authenticated: true,
			is_admin,
			is_active,
		}
	}

	/// State for a visitor with no session.
	pub fn anonymous() -> Self {
		Self {
			user_id: None,
			is_authenticated: false,
			is_admin: false,
			is_active: false,
		}
	}
}

impl Default for AuthState {
	fn default() -> Self {
		Self::anonymous()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(AuthState::authenticated(1, false, true), true)]
	#[case(AuthState::anonymous(), false)]
	fn test_authenticated_flag(#[case] state: AuthState, #[case] expected: bool) {
		assert_eq!(state.is_authenticated, expected);
	}

	#[test]
	fn test_anonymous_has_no_user_id() {
		let state = AuthState::anonymous();
		assert_eq!(state.user_id, None);
		assert!(!state.is_admin);
	}
}
