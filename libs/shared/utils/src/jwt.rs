use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{AuthenticatedUser, TokenClaims};
use shared_models::contact::Email;
use shared_models::UniqueId;

type HmacSha256 = Hmac<Sha256>;

/// Produce a compact HS256 token for the given claims.
pub fn sign_token(claims: &TokenClaims, jwt_secret: &str) -> Result<String, String> {
    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let payload = serde_json::to_string(claims).map_err(|e| format!("Invalid claims: {}", e))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthenticatedUser, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: TokenClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    if let Some(exp) = claims.exp {
        let now = chrono::Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let email = Email::parse(&claims.email).map_err(|e| format!("Invalid email claim: {}", e))?;

    let user = AuthenticatedUser::new(
        UniqueId::new(claims.sub),
        email,
        claims.name,
        claims.role,
        UniqueId::new(claims.entity_id),
    );

    debug!("Token validated successfully for user: {} ({})", user.id(), user.role());
    Ok(user)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use shared_models::auth::UserRole;

    fn claims(exp: Option<u64>) -> TokenClaims {
        TokenClaims {
            sub: "user-1".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            role: UserRole::Patient,
            entity_id: "patient-1".to_string(),
            exp,
            iat: None,
        }
    }

    #[test]
    fn signed_token_validates() {
        let token = sign_token(&claims(None), "secret").unwrap();
        let user = validate_token(&token, "secret").unwrap();

        assert_eq!(user.id().as_str(), "user-1");
        assert_eq!(user.entity_id().as_str(), "patient-1");
        assert!(user.is_patient());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_token(&claims(None), "secret").unwrap();
        assert_matches!(validate_token(&token, "other"), Err(e) if e == "Invalid token signature");
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign_token(&claims(Some(1)), "secret").unwrap();
        assert_eq!(validate_token(&token, "secret").unwrap_err(), "Token expired");
    }

    #[test]
    fn malformed_token_and_missing_secret() {
        assert_eq!(validate_token("a.b", "secret").unwrap_err(), "Invalid token format");
        assert_eq!(validate_token("a.b.c", "").unwrap_err(), "JWT secret is not set");
    }
}
