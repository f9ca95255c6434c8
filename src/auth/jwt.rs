use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_access_token(employee_id: &str, email: &str, secret: &str, ttl: usize) -> String {
    let claims = Claims {
        sub: employee_id.to_string(),
        email: email.to_string(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Access,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn generate_refresh_token(
    employee_id: &str,
    email: &str,
    secret: &str,
    ttl: usize,
) -> (String, Claims) {
    let claims = Claims {
        sub: employee_id.to_string(),
        email: email.to_string(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Refresh,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    (token, claims)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn access_token_roundtrip() {
        let token = generate_access_token("emp-1", "a@x.com", SECRET, 900);
        assert!(!token.is_empty());

        let claims = verify_token(&token, SECRET).expect("verify failed");
        assert_eq!(claims.sub, "emp-1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn refresh_token_carries_refresh_type() {
        let (token, issued) = generate_refresh_token("emp-2", "b@x.com", SECRET, 604800);
        let claims = verify_token(&token, SECRET).expect("verify failed");
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token("emp-3", "c@x.com", SECRET, 900);
        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let a = verify_token(&generate_access_token("e", "e@x.com", SECRET, 900), SECRET).unwrap();
        let b = verify_token(&generate_access_token("e", "e@x.com", SECRET, 900), SECRET).unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
