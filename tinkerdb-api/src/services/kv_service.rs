use std::sync::Arc;
use tinkerdb_core::metrics::{self, Timer};
use tinkerdb_core::TenantRegistry;
use tonic::{Request, Response, Status};
use tracing::debug;

use super::{validate, KEY_DELETED, KEY_FOUND, KEY_NOT_FOUND, KEY_SET};
use crate::proto::*;

/// gRPC front for the tenant registry's key-level operations
pub struct KvStoreService {
    store: Arc<TenantRegistry>,
}

impl KvStoreService {
    pub fn new(store: Arc<TenantRegistry>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl kv_store_server::KvStore for KvStoreService {
    async fn set(&self, request: Request<SetRequest>) -> Result<Response<SetResponse>, Status> {
        let timer = Timer::start("set");
        let req = request.into_inner();
        debug!(tenant = %req.tenant_id, key = %req.key, value_size = req.value.len(), "Set");

        if let Err(e) = validate(&req.tenant_id, Some(req.key.as_str())) {
            metrics::record_rejected("set");
            return Ok(Response::new(SetResponse {
                success: false,
                message: e.to_string(),
            }));
        }

        let response = match self.store.set(&req.tenant_id, &req.key, req.value) {
            Ok(()) => SetResponse {
                success: true,
                message: KEY_SET.to_string(),
            },
            Err(e) => SetResponse {
                success: false,
                message: format!("failed to set key: {}", e),
            },
        };
        metrics::record_tenant_count(self.store.tenant_count());
        timer.stop();

        Ok(Response::new(response))
    }

    async fn get(&self, request: Request<GetRequest>) -> Result<Response<GetResponse>, Status> {
        let timer = Timer::start("get");
        let req = request.into_inner();
        debug!(tenant = %req.tenant_id, key = %req.key, "Get");

        if let Err(e) = validate(&req.tenant_id, Some(req.key.as_str())) {
            metrics::record_rejected("get");
            return Ok(Response::new(GetResponse {
                found: false,
                value: Vec::new(),
                message: e.to_string(),
            }));
        }

        let response = match self.store.get(&req.tenant_id, &req.key) {
            Some(value) => GetResponse {
                found: true,
                value,
                message: KEY_FOUND.to_string(),
            },
            None => GetResponse {
                found: false,
                value: Vec::new(),
                message: KEY_NOT_FOUND.to_string(),
            },
        };
        timer.stop();

        Ok(Response::new(response))
    }

    async fn delete(
        &self,
        request: Request<DeleteRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let timer = Timer::start("delete");
        let req = request.into_inner();
        debug!(tenant = %req.tenant_id, key = %req.key, "Delete");

        if let Err(e) = validate(&req.tenant_id, Some(req.key.as_str())) {
            metrics::record_rejected("delete");
            return Ok(Response::new(DeleteResponse {
                success: false,
                message: e.to_string(),
            }));
        }

        let response = if self.store.delete(&req.tenant_id, &req.key) {
            DeleteResponse {
                success: true,
                message: KEY_DELETED.to_string(),
            }
        } else {
            DeleteResponse {
                success: false,
                message: KEY_NOT_FOUND.to_string(),
            }
        };
        timer.stop();

        Ok(Response::new(response))
    }

    async fn exists(
        &self,
        request: Request<ExistsRequest>,
    ) -> Result<Response<ExistsResponse>, Status> {
        let timer = Timer::start("exists");
        let req = request.into_inner();
        debug!(tenant = %req.tenant_id, key = %req.key, "Exists");

        let exists = match validate(&req.tenant_id, Some(req.key.as_str())) {
            Ok(()) => self.store.exists(&req.tenant_id, &req.key),
            Err(_) => {
                metrics::record_rejected("exists");
                false
            }
        };
        timer.stop();

        Ok(Response::new(ExistsResponse { exists }))
    }

    async fn keys(&self, request: Request<KeysRequest>) -> Result<Response<KeysResponse>, Status> {
        let timer = Timer::start("keys");
        let req = request.into_inner();
        debug!(tenant = %req.tenant_id, "Keys");

        let keys = match validate(&req.tenant_id, None) {
            Ok(()) => {
                let mut keys = self.store.keys(&req.tenant_id);
                keys.sort_unstable();
                keys
            }
            Err(_) => {
                metrics::record_rejected("keys");
                Vec::new()
            }
        };
        timer.stop();

        Ok(Response::new(KeysResponse { keys }))
    }
}
