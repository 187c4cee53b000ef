use moka::future::Cache;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::Car;

const POPULAR_PREFIX: &str = "cars:popular:";

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to invalidate local cache: {0}")]
    Invalidation(String),
}

/// Two-tier cache for car catalogue reads
///
/// L1 is an in-process moka cache holding serialized JSON, L2 is Redis
/// shared across instances. The recommendation path never reads through it;
/// it only serves `GET /cars/{id}` and `GET /cars/popular`.
#[derive(Clone)]
pub struct CarCache {
    redis: ConnectionManager,
    local: Cache<String, Arc<str>>,
    ttl_secs: u64,
}

impl CarCache {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let local = Cache::builder()
            .max_capacity(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Ok(Self { redis, local, ttl_secs })
    }

    pub async fn car(&self, car_id: i64) -> Result<Option<Car>, CacheError> {
        self.read(&car_key(car_id)).await
    }

    pub async fn store_car(&self, car: &Car) -> Result<(), CacheError> {
        self.write(car_key(car.id), car).await
    }

    pub async fn popular(&self, limit: i64) -> Result<Option<Vec<Car>>, CacheError> {
        self.read(&popular_key(limit)).await
    }

    pub async fn store_popular(&self, limit: i64, cars: &[Car]) -> Result<(), CacheError> {
        self.write(popular_key(limit), cars).await
    }

    /// Forget a car and every cached popular list
    pub async fn invalidate_car(&self, car_id: Option<i64>) -> Result<(), CacheError> {
        if let Some(id) = car_id {
            let key = car_key(id);
            self.local.invalidate(&key).await;
            let mut conn = self.redis.clone();
            conn.del::<_, ()>(&key).await?;
        }
        self.invalidate_popular().await
    }

    async fn invalidate_popular(&self) -> Result<(), CacheError> {
        self.local
            .invalidate_entries_if(|key, _| key.starts_with(POPULAR_PREFIX))
            .map_err(|e| CacheError::Invalidation(e.to_string()))?;

        let pattern = format!("{}*", POPULAR_PREFIX);
        let mut conn = self.redis.clone();
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                conn.del::<_, ()>(keys).await?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!("Invalidated popular car lists");
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        if let Some(json) = self.local.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(serde_json::from_str(&json)?));
        }

        let mut conn = self.redis.clone();
        let Some(json) = conn.get::<_, Option<String>>(key).await? else {
            tracing::trace!("Cache miss: {}", key);
            return Ok(None);
        };

        tracing::trace!("L2 cache hit: {}", key);
        let value = serde_json::from_str(&json)?;
        self.local.insert(key.to_string(), Arc::from(json)).await;
        Ok(Some(value))
    }

    async fn write<T: Serialize + ?Sized>(&self, key: String, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, &json, self.ttl_secs).await?;
        self.local.insert(key, Arc::from(json)).await;
        Ok(())
    }
}

fn car_key(car_id: i64) -> String {
    format!("car:{}", car_id)
}

fn popular_key(limit: i64) -> String {
    format!("{}{}", POPULAR_PREFIX, limit)
}
