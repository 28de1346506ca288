//! Bearer token records and lifecycle helpers.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::Secret};

/// Current lifecycle status for an access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is not yet valid because the issued-at instant is in the future.
	Pending,
	/// Token is currently valid.
	Active,
	/// Token reached its expiry instant.
	Expired,
}

/// Bearer token issued by the client-credentials grant.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Bearer value; callers must avoid logging it.
	pub secret: Secret,
	/// Instant the token endpoint answered.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from `issued_at + expires_in`.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Creates a token valid for `lifetime` starting at `issued_at`.
	///
	/// A zero lifetime yields a single-use token that any cache treats as expired. An expiry past
	/// the last representable instant saturates there; use [`AccessToken::try_new`] to reject it.
	pub fn new(secret: impl Into<String>, issued_at: OffsetDateTime, lifetime: Duration) -> Self {
		let secret = secret.into();

		Self::try_new(secret.clone(), issued_at, lifetime).unwrap_or_else(|| Self {
			secret: Secret::new(secret),
			issued_at,
			expires_at: PrimitiveDateTime::MAX.assume_utc(),
		})
	}

	/// Like [`AccessToken::new`], but returns `None` when the expiry is not representable.
	pub fn try_new(
		secret: impl Into<String>,
		issued_at: OffsetDateTime,
		lifetime: Duration,
	) -> Option<Self> {
		let lifetime = if lifetime.is_negative() { Duration::ZERO } else { lifetime };
		let expires_at = issued_at.checked_add(lifetime)?;

		Some(Self { secret: Secret::new(secret), issued_at, expires_at })
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant < self.issued_at {
			return TokenStatus::Pending;
		}
		if instant >= self.expires_at {
			return TokenStatus::Expired;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` when the token is expired or will expire within `window` of `now`.
	pub fn needs_refresh(&self, now: OffsetDateTime, window: Duration) -> bool {
		if self.is_expired_at(now) {
			return true;
		}

		self.expires_at - now <= window
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn status_transitions_cover_all_states() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = AccessToken::new("access", issued, Duration::hours(1));

		assert_eq!(token.status_at(macros::datetime!(2024-12-31 23:59 UTC)), TokenStatus::Pending);
		assert_eq!(token.status_at(macros::datetime!(2025-01-01 00:30 UTC)), TokenStatus::Active);
		assert_eq!(token.status_at(macros::datetime!(2025-01-01 01:00 UTC)), TokenStatus::Expired);
	}

	#[test]
	fn refresh_window_triggers_early() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = AccessToken::new("access", issued, Duration::minutes(30));

		assert!(!token.needs_refresh(macros::datetime!(2025-01-01 00:10 UTC), Duration::minutes(1)));
		assert!(token.needs_refresh(macros::datetime!(2025-01-01 00:29:30 UTC), Duration::minutes(1)));
		assert!(token.needs_refresh(macros::datetime!(2025-01-01 00:31 UTC), Duration::ZERO));
	}

	#[test]
	fn zero_lifetime_is_single_use() {
		let now = OffsetDateTime::now_utc();
		let token = AccessToken::new("once", now, Duration::ZERO);

		assert!(token.is_expired_at(now));
		assert!(token.needs_refresh(now, Duration::ZERO));
	}

	#[test]
	fn unrepresentable_expiry_is_rejected_or_saturated() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let lifetime = Duration::seconds(1_000_000_000_000);

		assert!(AccessToken::try_new("huge", issued, lifetime).is_none());
		assert_eq!(
			AccessToken::new("huge", issued, lifetime).expires_at,
			PrimitiveDateTime::MAX.assume_utc(),
		);
	}

	#[test]
	fn debug_redacts_secret() {
		let token = AccessToken::new("top-secret", OffsetDateTime::now_utc(), Duration::minutes(5));

		assert!(!format!("{token:?}").contains("top-secret"));
	}
}
