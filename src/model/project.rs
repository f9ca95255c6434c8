use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Project {
    #[schema(example = 10)]
    pub id: u64,

    #[schema(example = "Harbor tower")]
    pub name: String,

    #[schema(example = 3)]
    pub building_id: u64,

    /// How many shift rows this project may accumulate
    #[schema(example = 6)]
    pub required_shifts: u32,

    #[schema(example = 8.0)]
    pub hours_per_shift: f64,

    #[schema(example = 25.0)]
    pub pay_per_hour: f64,
}
