use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::model::{Claims, Role, ACCESS_TOKEN_TYPE};

pub const ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 15 * 60; // 15 minutes

/// Encode claims with HS256. Tokens are normally issued by the auth service;
/// this is the counterpart of [`validate_token`] for tooling and tests.
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Access token for `sub` in `school_id`, valid for 15 minutes.
pub fn generate_access_token(
    sub: &str,
    school_id: &str,
    role: Role,
    student_id: Option<&str>,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: sub.to_string(),
        school_id: school_id.to_string(),
        role,
        name: None,
        student_id: student_id.map(str::to_string),
        exp: now + ACCESS_TOKEN_EXPIRY_SECONDS as usize,
        iat: now,
        token_type: ACCESS_TOKEN_TYPE.to_string(),
    };
    encode_token(&claims, secret)
}

/// Validate and decode a token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
