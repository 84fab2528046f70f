use moka::future::Cache;
use once_cell::sync::Lazy;
use std::time::Duration;

use crate::{error::StoreResult, model::shift::Shift, store::AttendanceStore};

/// user id => first active shift (None when unassigned).
/// Only the live view reads through this; the daily job always hits the store.
pub static SHIFT_CACHE: Lazy<Cache<u64, Option<Shift>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(50_000)
        .time_to_live(Duration::from_secs(300)) // 5 min TTL
        .build()
});

/// Returns the cached shift of a user, loading it from the store on a miss.
pub async fn cached_shift<S: AttendanceStore>(store: &S, user_id: u64) -> StoreResult<Option<Shift>> {
    if let Some(shift) = SHIFT_CACHE.get(&user_id).await {
        return Ok(shift);
    }

    let shift = store.shift(user_id).await?;
    log::debug!("Shift cache miss for user {}: {:?}", user_id, shift.as_ref().map(|s| &s.name));
    SHIFT_CACHE.insert(user_id, shift.clone()).await;

    Ok(shift)
}
