/// Read-through caching around an async computation.
///
/// Returns the cached value for `$key` when present. On a miss, or when the
/// cache cannot be read, awaits `$block`, queues the result for a background
/// write with `$ttl` seconds to live, and returns it. A cache read failure is
/// logged and never fails the request.
///
/// Must be used in a function returning `AppResult<T>`.
///
/// # Example
/// ```rust,ignore
/// let movies = cached!(cache, CacheKey::Catalog, 300, store.list_movies());
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            other => {
                if let Err(e) = other {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, using store");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
