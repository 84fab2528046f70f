use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Active user the daily job iterates over.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize, sqlx::FromRow)]
#[display(fmt = "{} (#{})", username, id)]
pub struct UserRef {
    pub id: u64,
    pub username: String,
}
