use sqlx::FromRow;

/// A principal allowed to administer at most one project at a time.
#[derive(FromRow)]
pub struct Manager {
    pub id: String,
    pub handling_project: Option<u64>,
}
