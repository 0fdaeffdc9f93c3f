/// Read-through caching around an async block.
///
/// Returns the cached value when `$key` is present. Otherwise awaits `$block`,
/// queues the result for a background write with `$ttl` seconds to live and
/// returns it.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::cache::Cache)
/// * `$key`: the [`CacheKey`](crate::cache::CacheKey) to read and write
/// * `$ttl`: time-to-live in seconds
/// * `$block`: future producing an `AppResult` on a miss
///
/// # Example
/// ```rust,ignore
/// let movie: Movie = cached!(self.cache, CacheKey::MovieDetails { id, language }, 3600, async move {
///     fetch_movie(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
