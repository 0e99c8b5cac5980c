//! Site engagement counters: the like button.
//!
//! One like per store, enforced with a flag key. Counters are independent
//! of the panel content and survive a content clear.

use crate::store::{keys, StoreAccessor};

/// Current like count.
pub async fn like_count(store: &StoreAccessor) -> u64 {
    store.load(keys::LIKES, 0).await
}

/// Whether this store has already registered a like.
pub async fn has_liked(store: &StoreAccessor) -> bool {
    store.load(keys::USER_LIKED, false).await
}

/// Register a like once. Returns `false` (and changes nothing) when this
/// store already liked.
pub async fn register_like(store: &StoreAccessor) -> bool {
    if has_liked(store).await {
        return false;
    }
    let likes = like_count(store).await + 1;
    store.save(keys::LIKES, &likes).await;
    store.save(keys::USER_LIKED, &true).await;
    true
}
