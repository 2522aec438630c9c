use async_trait::async_trait;
use chrono::Duration;
use redis::{Client, Commands, Connection, Script};

use super::cache::CacheAdapter;
use crate::config::CacheConfig;
use crate::error::{PasscodeError, PasscodeResult};

const DELETE_IF_MATCH_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Redis-backed cache. Keys are namespaced as `"{cache_name}:{key}"` and
/// written with `SET ... EX ttl`.
pub struct RedisCacheAdapter {
    client: Client,
    namespace: String,
    ttl_seconds: u64,
    delete_if_match: Script,
}

impl RedisCacheAdapter {
    pub fn new(redis_url: &str, config: CacheConfig) -> PasscodeResult<Self> {
        config.validate()?;
        let client = Client::open(redis_url)
            .map_err(|e| PasscodeError::cache_unavailable(format!("Redis client error: {}", e)))?;

        Ok(Self {
            client,
            namespace: config.name,
            ttl_seconds: ttl_in_whole_seconds(config.ttl),
            delete_if_match: Script::new(DELETE_IF_MATCH_SCRIPT),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// `SCAN MATCH` pattern covering exactly this cache's keys.
    fn namespace_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.namespace.len() + 2);
        for c in self.namespace.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push_str(":*");
        pattern
    }

    fn connection(&self) -> PasscodeResult<Connection> {
        self.client
            .get_connection()
            .map_err(|e| PasscodeError::cache(format!("Redis connection error: {}", e)))
    }
}

/// `EX` takes whole seconds; round up so entries never expire early.
fn ttl_in_whole_seconds(ttl: Duration) -> u64 {
    let mut seconds = ttl.num_seconds();
    if ttl.subsec_nanos() > 0 {
        seconds += 1;
    }
    seconds.max(1) as u64
}

#[async_trait]
impl CacheAdapter for RedisCacheAdapter {
    async fn set(&self, key: &str, value: &str) -> PasscodeResult<()> {
        let mut conn = self.connection()?;

        let _: () = conn
            .set_ex(self.key(key), value, self.ttl_seconds)
            .map_err(|e| PasscodeError::cache(format!("Redis set error: {}", e)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> PasscodeResult<Option<String>> {
        let mut conn = self.connection()?;

        let result: Option<String> = conn
            .get(self.key(key))
            .map_err(|e| PasscodeError::cache(format!("Redis get error: {}", e)))?;

        Ok(result)
    }

    async fn delete(&self, key: &str) -> PasscodeResult<()> {
        let mut conn = self.connection()?;

        let _: () = conn
            .del(self.key(key))
            .map_err(|e| PasscodeError::cache(format!("Redis delete error: {}", e)))?;

        Ok(())
    }

    async fn delete_if_match(&self, key: &str, expected: &str) -> PasscodeResult<bool> {
        let mut conn = self.connection()?;

        let removed: i64 = self
            .delete_if_match
            .key(self.key(key))
            .arg(expected)
            .invoke(&mut conn)
            .map_err(|e| PasscodeError::cache(format!("Redis compare-and-delete error: {}", e)))?;

        Ok(removed == 1)
    }

    async fn exists(&self, key: &str) -> PasscodeResult<bool> {
        let mut conn = self.connection()?;

        let exists: bool = conn
            .exists(self.key(key))
            .map_err(|e| PasscodeError::cache(format!("Redis exists error: {}", e)))?;

        Ok(exists)
    }

    async fn clear(&self) -> PasscodeResult<()> {
        let mut conn = self.connection()?;

        let keys: Vec<String> = conn
            .scan_match::<_, String>(self.namespace_pattern())
            .map_err(|e| PasscodeError::cache(format!("Redis scan error: {}", e)))?
            .collect();
        if !keys.is_empty() {
            let _: () = conn
                .del(keys)
                .map_err(|e| PasscodeError::cache(format!("Redis clear error: {}", e)))?;
        }

        Ok(())
    }
}
