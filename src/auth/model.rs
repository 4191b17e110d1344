use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Admins and teachers see school wide data.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }
}

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub school_id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Linked student record, student accounts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub exp: usize,         // expiration time
    pub iat: usize,         // issued at
    pub token_type: String, // only "access" is accepted
}

impl Claims {
    /// Student record owned by this session.
    pub fn own_student_id(&self) -> Option<&str> {
        match self.role {
            Role::Student => Some(self.student_id.as_deref().unwrap_or(&self.sub)),
            _ => None,
        }
    }

    pub fn require_staff(&self) -> Result<(), AuthError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Staff may read any student of their school, students only themselves.
    pub fn require_student_access(&self, student_id: &str) -> Result<(), AuthError> {
        if self.role.is_staff() || self.own_student_id() == Some(student_id) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid token type")]
    WrongTokenType,
    #[error("Akses ditolak")]
    Forbidden,
}
