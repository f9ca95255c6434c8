use serde::Serialize;
use utoipa::ToSchema;

/// A named subdivision of a project's workforce.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Group {
    #[schema(example = "c0a1f3de-88a1-4c2b-9a0e-33d1c2b4a5f6")]
    pub id: String,

    #[schema(example = 10)]
    pub project: u64,

    #[schema(example = "Morning")]
    pub group_name: String,
}
