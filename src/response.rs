use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Response metadata. Lists carry their item count; reports and errors carry
/// the generation time only.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<usize>,
    pub generated_at: DateTime<Utc>,
}

impl Meta {
    pub fn listed(total: usize) -> Self {
        Self {
            total: Some(total),
            generated_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self {
            total: None,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
