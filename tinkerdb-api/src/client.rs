//! Typed client for a TinkerDB server
//!
//! A [`KvClient`] is bound to one tenant at a time; every key operation is
//! issued against that tenant. Clones share the underlying channel.

use std::time::Duration;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};

use crate::proto::kv_store_client::KvStoreClient;
use crate::proto::tenant_admin_client::TenantAdminClient;
use crate::proto::*;
use crate::services::{KEY_NOT_FOUND, TENANT_NOT_FOUND};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Request failed: {0}")]
    Status(#[from] tonic::Status),

    #[error("Server rejected request: {0}")]
    Rejected(String),

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Connection settings for [`KvClient::connect`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address, with or without an `http://` scheme
    pub address: String,
    pub tenant_id: String,
    /// Applies to connecting and to every request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8080".to_string(),
            tenant_id: "default".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Prefix bare `host:port` addresses with `http://`.
fn normalize_address(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

/// Map an unsuccessful response to `NotFound` when the server reported a
/// miss, `Rejected` otherwise.
fn failure(message: String, not_found: &str, subject: &str) -> ClientError {
    if message == not_found {
        ClientError::NotFound(subject.to_string())
    } else {
        ClientError::Rejected(message)
    }
}

/// Stats for one tenant as reported by the admin service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantStats {
    pub exists: bool,
    pub key_count: u64,
}

#[derive(Debug, Clone)]
pub struct KvClient {
    kv: KvStoreClient<Channel>,
    admin: TenantAdminClient<Channel>,
    tenant_id: String,
}

impl KvClient {
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let endpoint = Endpoint::from_shared(normalize_address(&config.address))
            .map_err(|e| ClientError::InvalidAddress(format!("{}: {}", config.address, e)))?
            .connect_timeout(config.timeout)
            .timeout(config.timeout);

        let channel = endpoint.connect().await?;
        Ok(Self::with_channel(channel, config.tenant_id))
    }

    /// Build a client over an existing channel.
    pub fn with_channel(channel: Channel, tenant_id: impl Into<String>) -> Self {
        Self {
            kv: KvStoreClient::new(channel.clone()),
            admin: TenantAdminClient::new(channel),
            tenant_id: tenant_id.into(),
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant_id
    }

    pub fn set_tenant(&mut self, tenant_id: impl Into<String>) {
        self.tenant_id = tenant_id.into();
    }

    pub async fn set(&self, key: &str, value: impl Into<Vec<u8>>) -> ClientResult<()> {
        let resp = self
            .kv
            .clone()
            .set(SetRequest {
                tenant_id: self.tenant_id.clone(),
                key: key.to_string(),
                value: value.into(),
            })
            .await?
            .into_inner();

        if !resp.success {
            return Err(ClientError::Rejected(resp.message));
        }
        Ok(())
    }

    pub async fn set_string(&self, key: &str, value: &str) -> ClientResult<()> {
        self.set(key, value.as_bytes()).await
    }

    /// Value stored under `key`; a miss is [`ClientError::NotFound`].
    pub async fn get(&self, key: &str) -> ClientResult<Vec<u8>> {
        let resp = self
            .kv
            .clone()
            .get(GetRequest {
                tenant_id: self.tenant_id.clone(),
                key: key.to_string(),
            })
            .await?
            .into_inner();

        if resp.found {
            Ok(resp.value)
        } else {
            Err(failure(resp.message, KEY_NOT_FOUND, key))
        }
    }

    pub async fn get_string(&self, key: &str) -> ClientResult<String> {
        let value = self.get(key).await?;
        Ok(String::from_utf8(value)?)
    }

    pub async fn delete(&self, key: &str) -> ClientResult<()> {
        let resp = self
            .kv
            .clone()
            .delete(DeleteRequest {
                tenant_id: self.tenant_id.clone(),
                key: key.to_string(),
            })
            .await?
            .into_inner();

        if resp.success {
            Ok(())
        } else {
            Err(failure(resp.message, KEY_NOT_FOUND, key))
        }
    }

    pub async fn exists(&self, key: &str) -> ClientResult<bool> {
        let resp = self
            .kv
            .clone()
            .exists(ExistsRequest {
                tenant_id: self.tenant_id.clone(),
                key: key.to_string(),
            })
            .await?
            .into_inner();
        Ok(resp.exists)
    }

    /// Keys of the current tenant, sorted.
    pub async fn keys(&self) -> ClientResult<Vec<String>> {
        let resp = self
            .kv
            .clone()
            .keys(KeysRequest {
                tenant_id: self.tenant_id.clone(),
            })
            .await?
            .into_inner();
        Ok(resp.keys)
    }

    pub async fn tenant_count(&self) -> ClientResult<u64> {
        let resp = self
            .admin
            .clone()
            .tenant_count(TenantCountRequest {})
            .await?
            .into_inner();
        Ok(resp.count)
    }

    pub async fn list_tenants(&self) -> ClientResult<Vec<String>> {
        let resp = self
            .admin
            .clone()
            .list_tenants(ListTenantsRequest {})
            .await?
            .into_inner();
        Ok(resp.tenants)
    }

    pub async fn tenant_stats(&self, tenant_id: &str) -> ClientResult<TenantStats> {
        let resp = self
            .admin
            .clone()
            .tenant_stats(TenantStatsRequest {
                tenant_id: tenant_id.to_string(),
            })
            .await?
            .into_inner();
        Ok(TenantStats {
            exists: resp.exists,
            key_count: resp.key_count,
        })
    }

    /// Remove `tenant_id` and all of its keys.
    pub async fn delete_tenant(&self, tenant_id: &str) -> ClientResult<()> {
        let resp = self
            .admin
            .clone()
            .delete_tenant(DeleteTenantRequest {
                tenant_id: tenant_id.to_string(),
            })
            .await?
            .into_inner();

        if resp.success {
            Ok(())
        } else {
            Err(failure(resp.message, TENANT_NOT_FOUND, tenant_id))
        }
    }
}
