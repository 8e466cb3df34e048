use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{StoreError, SupporterStore};

// Reply envelope of the REST protocol: exactly one of the two is set
#[derive(Deserialize)]
struct KvReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for an Upstash-style REST key-value store.
///
/// Each command is sent as `POST <base>` with the command and its arguments
/// as a JSON array body (`["sadd", key, member]`) and the token as a bearer
/// credential. Arguments travel verbatim, whatever characters they contain.
pub struct RestKv {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl RestKv {
    pub fn new(client: reqwest::Client, base_url: &str, token: &str) -> Result<Self, StoreError> {
        let base_url =
            Url::parse(base_url).map_err(|_| StoreError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }

    // Run one command and hand back its `result` member
    async fn command(&self, args: &[&str]) -> Result<Value, StoreError> {
        let command = args.first().copied().unwrap_or_default().to_string();

        debug!(command = %command, "kv command");

        let reply: KvReply = self
            .client
            .post(self.base_url.clone())
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await?
            .json()
            .await?;

        if let Some(message) = reply.error {
            return Err(StoreError::Command { command, message });
        }
        Ok(reply.result.unwrap_or(Value::Null))
    }

    async fn integer(&self, args: &[&str]) -> Result<i64, StoreError> {
        let value = self.command(args).await?;
        value.as_i64().ok_or_else(|| StoreError::UnexpectedReply {
            command: args[0].to_string(),
            reply: value.to_string(),
        })
    }
}

#[async_trait]
impl SupporterStore for RestKv {
    async fn incr_with_expiry(&self, key: &str, ttl: Duration) -> Result<i64, StoreError> {
        let count = self.integer(&["incr", key]).await?;
        if count == 1 {
            let secs = ttl.as_secs().to_string();
            self.command(&["expire", key, secs.as_str()]).await?;
        }
        Ok(count)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        Ok(self.integer(&["sadd", key, member]).await? == 1)
    }

    async fn list_prepend(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.command(&["lpush", key, value]).await?;
        Ok(())
    }

    async fn list_trim(&self, key: &str, start: i64, stop: i64) -> Result<(), StoreError> {
        let (start, stop) = (start.to_string(), stop.to_string());
        self.command(&["ltrim", key, start.as_str(), stop.as_str()]).await?;
        Ok(())
    }

    async fn list_range(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, StoreError> {
        let (start, stop) = (start.to_string(), stop.to_string());
        let value = self.command(&["lrange", key, start.as_str(), stop.as_str()]).await?;

        // anything but an array reads as an empty list
        let Value::Array(items) = value else {
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect())
    }
}
