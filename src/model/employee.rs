use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = "7b39c2a4-5b2e-4f6e-9f1d-0a8c2f6d1e55")]
    pub id: String,

    #[schema(example = "Alice")]
    pub name: String,

    #[schema(example = 30)]
    pub age: u32,

    #[schema(example = "alice@example.com")]
    pub email: String,

    #[schema(example = "North yard", nullable = true)]
    pub residence_point: Option<String>,

    #[schema(example = "weekdays", nullable = true)]
    pub availability: Option<String>,

    #[schema(example = 400.0)]
    pub total_pay: f64,
}
