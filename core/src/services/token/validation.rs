//! Rules a decoded token must satisfy before its identity is trusted

use chrono::{DateTime, Utc};

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::{Role, UserId};
use crate::domain::value_objects::{SecurityContext, Validated};
use crate::errors::TokenError;

/// Run every claim rule and collect all failures
///
/// `now` must come from the rounded clock.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Validated<SecurityContext> {
    subject_is_user_id(claims)
        .zip(role_is_supported(claims))
        .zip(token_is_not_expired(claims, now))
        .map(|((user_id, role), ())| SecurityContext::new(user_id, role))
}

fn subject_is_user_id(claims: &Claims) -> Validated<UserId> {
    Validated::from_result(claims.subject.parse::<UserId>().map_err(|_| {
        TokenError::MalformedSubject {
            subject: claims.subject.clone(),
        }
    }))
}

fn role_is_supported(claims: &Claims) -> Validated<Role> {
    Validated::from_result(claims.role.parse::<Role>().map_err(|_| {
        TokenError::UnsupportedRoleClaim {
            role: claims.role.clone(),
        }
    }))
}

// expires_at == now is still accepted
fn token_is_not_expired(claims: &Claims, now: DateTime<Utc>) -> Validated<()> {
    if claims.expires_at >= now {
        Validated::valid(())
    } else {
        Validated::invalid(TokenError::TokenExpired)
    }
}
