use actix_web::HttpRequest;

use super::jwt::validate_token;
use super::model::{AuthError, Claims, ACCESS_TOKEN_TYPE};

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validate token from HttpRequest and return claims
pub fn validate_request_token(req: &HttpRequest, secret: &str) -> Result<Claims, AuthError> {
    let token = extract_token(req).ok_or(AuthError::MissingToken)?;

    let claims = validate_token(token, secret).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        AuthError::InvalidToken
    })?;

    if claims.token_type != ACCESS_TOKEN_TYPE {
        log::warn!("Rejected {} token for {}", claims.token_type, claims.sub);
        return Err(AuthError::WrongTokenType);
    }

    Ok(claims)
}
