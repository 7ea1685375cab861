/// Read-through caching over an optional [`Cache`](crate::db::Cache).
///
/// With no cache configured the block runs directly. A cache read error is
/// logged and treated as a miss, so Redis trouble never fails the lookup
/// itself. Values computed by the block are written back in the background.
///
/// # Arguments
/// * `$cache`: `&Option<Cache>`
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write
/// * `$ttl`: time-to-live in seconds for the written value
/// * `$block`: future producing `AppResult<T>` on a miss
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                let hit = match cache.get_from_cache(&$key).await {
                    Ok(hit) => hit,
                    Err(e) => {
                        tracing::warn!(error = %e, key = %$key, "Cache read failed, treating as miss");
                        None
                    }
                };
                match hit {
                    Some(value) => {
                        tracing::debug!(key = %$key, "Cache hit");
                        Ok(value)
                    }
                    None => {
                        let value = $block.await?;
                        cache.set_in_background(&$key, &value, $ttl);
                        Ok(value)
                    }
                }
            }
            None => $block.await,
        }
    }};
}
