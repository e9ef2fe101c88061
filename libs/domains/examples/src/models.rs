use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

/// Longest accepted name, counted in characters after trimming
pub const MAX_NAME_LEN: usize = 255;

/// Largest page `list` will return; bigger limits are clamped
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the caller gives none
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Field order in which validation failures are reported
const FIELD_ORDER: [&str; 3] = ["name", "description", "value"];

fn validate_example_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("required").with_message("name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new("length")
            .with_message("name cannot exceed 255 characters".into()));
    }
    Ok(())
}

/// NaN fails too: it compares false against every bound.
fn validate_example_value(value: f64) -> Result<(), ValidationError> {
    if !(value >= 0.0) {
        return Err(ValidationError::new("range").with_message("value cannot be negative".into()));
    }
    Ok(())
}

/// Picks the message of the first failing rule, walking fields in declaration order.
pub fn first_violation(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    FIELD_ORDER
        .iter()
        .find_map(|field| {
            fields.get(*field).and_then(|errs| errs.first()).map(|err| {
                err.message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .unwrap_or_else(|| errors.to_string())
}

/// Truncates to microseconds, the resolution PostgreSQL keeps.
pub fn storage_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

/// A persisted example record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Example {
    /// Store-assigned identifier; `0` until the record is created
    pub id: i64,
    pub name: String,
    pub description: String,
    pub value: f64,
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExampleRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_example_name"))]
    #[schema(example = "Widget")]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "description cannot exceed 1000 characters"))]
    #[schema(example = "A widget")]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "validate_example_value"))]
    #[schema(example = 9.99)]
    pub value: f64,
    #[serde(default)]
    pub is_active: bool,
}

/// A page of examples
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExampleResponse {
    pub data: Vec<Example>,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Pagination parameters for listing examples
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size, clamped to 100
    #[serde(default = "default_limit")]
    #[param(default = 10, minimum = 1)]
    pub limit: i64,
    /// Number of rows to skip
    #[serde(default)]
    #[param(default = 0, minimum = 0)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Example {
    /// Builds an unsaved record from a validated request
    pub fn new(input: ExampleRequest, now: DateTime<Utc>) -> Self {
        let now = storage_timestamp(now);
        Self {
            id: 0,
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            value: input.value,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field. `created_at` is kept and `updated_at`
    /// never moves before it.
    pub fn apply_update(&mut self, input: ExampleRequest, now: DateTime<Utc>) {
        self.name = input.name.trim().to_string();
        self.description = input.description.trim().to_string();
        self.value = input.value;
        self.is_active = input.is_active;
        self.updated_at = storage_timestamp(now).max(self.created_at);
    }
}
