use chrono::Duration;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use super::{alice, epoch, SECRET};
use crate::domain::entities::token::{AccessToken, Claims};
use crate::errors::TokenError;
use crate::services::token::{JwtTokenSigner, TokenSecret, TokenSigner};

fn claims() -> Claims {
    Claims::for_context("picshare-test", &alice(), epoch(), Duration::minutes(15)).unwrap()
}

fn secret() -> TokenSecret {
    TokenSecret::new(SECRET)
}

#[tokio::test]
async fn test_generate_then_extract_preserves_every_claim() {
    let signer = JwtTokenSigner::new();
    let claims = claims();

    let token = signer.generate(&claims, &secret()).await.unwrap();
    let extracted = signer.extract(&token, &secret()).await.unwrap();

    assert_eq!(extracted, claims);
    assert_eq!(extracted.subject, "42");
    assert_eq!(extracted.audience, "42");
    assert_eq!(extracted.role, "user");
}

#[tokio::test]
async fn test_extract_does_not_judge_claim_content() {
    let signer = JwtTokenSigner::new();
    let mut claims = claims();
    claims.subject = "not-a-number".to_string();
    claims.role = "root".to_string();
    claims.expires_at = epoch() - Duration::days(365);

    let token = signer.generate(&claims, &secret()).await.unwrap();
    let extracted = signer.extract(&token, &secret()).await.unwrap();

    assert_eq!(extracted, claims);
}

#[tokio::test]
async fn test_extract_rejects_any_altered_character() {
    let signer = JwtTokenSigner::new();
    let token = signer.generate(&claims(), &secret()).await.unwrap();
    let original = token.as_str().to_string();

    for position in 0..original.len() {
        let mut bytes = original.clone().into_bytes();
        bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
        let altered = AccessToken::new(String::from_utf8(bytes).unwrap());

        assert_eq!(
            signer.extract(&altered, &secret()).await,
            Err(TokenError::ClaimsExtractionError),
            "altering position {} was not detected",
            position
        );
    }
}

#[tokio::test]
async fn test_extract_rejects_wrong_secret() {
    let signer = JwtTokenSigner::new();
    let token = signer.generate(&claims(), &secret()).await.unwrap();

    let result = signer
        .extract(&token, &TokenSecret::new("some-other-secret"))
        .await;

    assert_eq!(result, Err(TokenError::ClaimsExtractionError));
}

#[tokio::test]
async fn test_extract_rejects_garbage() {
    let signer = JwtTokenSigner::new();

    for raw in ["", "abc", "a.b.c", "...."] {
        let result = signer.extract(&AccessToken::new(raw), &secret()).await;
        assert_eq!(result, Err(TokenError::ClaimsExtractionError), "{:?}", raw);
    }
}

#[tokio::test]
async fn test_extract_rejects_missing_role_claim() {
    let payload = json!({
        "iss": "picshare-test",
        "sub": "42",
        "aud": "42",
        "iat": epoch().timestamp(),
        "exp": (epoch() + Duration::minutes(15)).timestamp(),
    });
    let raw = encode(
        &Header::new(Algorithm::HS512),
        &payload,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = JwtTokenSigner::new()
        .extract(&AccessToken::new(raw), &secret())
        .await;

    assert_eq!(result, Err(TokenError::ClaimsExtractionError));
}

#[tokio::test]
async fn test_extract_rejects_other_algorithm() {
    let payload = json!({
        "iss": "picshare-test",
        "sub": "42",
        "aud": "42",
        "iat": epoch().timestamp(),
        "exp": (epoch() + Duration::minutes(15)).timestamp(),
        "role": "user",
    });
    let raw = encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = JwtTokenSigner::new()
        .extract(&AccessToken::new(raw), &secret())
        .await;

    assert_eq!(result, Err(TokenError::ClaimsExtractionError));
}
