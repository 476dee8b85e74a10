use std::sync::Arc;
use tinkerdb_core::metrics::{self, Timer};
use tinkerdb_core::TenantRegistry;
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use super::{validate, TENANT_DELETED, TENANT_NOT_FOUND};
use crate::error::ApiError;
use crate::proto::*;

/// Tenant-level administration: counts, listings and whole-tenant removal
pub struct TenantAdminService {
    store: Arc<TenantRegistry>,
}

impl TenantAdminService {
    pub fn new(store: Arc<TenantRegistry>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl tenant_admin_server::TenantAdmin for TenantAdminService {
    async fn tenant_count(
        &self,
        _request: Request<TenantCountRequest>,
    ) -> Result<Response<TenantCountResponse>, Status> {
        let timer = Timer::start("tenant_count");
        let count = self.store.tenant_count();
        metrics::record_tenant_count(count);
        timer.stop();

        Ok(Response::new(TenantCountResponse {
            count: count as u64,
        }))
    }

    async fn list_tenants(
        &self,
        _request: Request<ListTenantsRequest>,
    ) -> Result<Response<ListTenantsResponse>, Status> {
        let timer = Timer::start("list_tenants");
        let mut tenants = self.store.tenants();
        tenants.sort_unstable();
        timer.stop();

        Ok(Response::new(ListTenantsResponse { tenants }))
    }

    async fn tenant_stats(
        &self,
        request: Request<TenantStatsRequest>,
    ) -> Result<Response<TenantStatsResponse>, Status> {
        let timer = Timer::start("tenant_stats");
        let req = request.into_inner();
        debug!(tenant = %req.tenant_id, "TenantStats");

        if let Err(e) = validate(&req.tenant_id, None) {
            metrics::record_rejected("tenant_stats");
            return Err(ApiError::from(e).into());
        }

        let response = match self.store.key_count(&req.tenant_id) {
            Some(count) => TenantStatsResponse {
                exists: true,
                key_count: count as u64,
            },
            None => TenantStatsResponse {
                exists: false,
                key_count: 0,
            },
        };
        timer.stop();

        Ok(Response::new(response))
    }

    async fn delete_tenant(
        &self,
        request: Request<DeleteTenantRequest>,
    ) -> Result<Response<DeleteTenantResponse>, Status> {
        let timer = Timer::start("delete_tenant");
        let req = request.into_inner();

        if let Err(e) = validate(&req.tenant_id, None) {
            metrics::record_rejected("delete_tenant");
            return Ok(Response::new(DeleteTenantResponse {
                success: false,
                message: e.to_string(),
            }));
        }

        let response = if self.store.delete_tenant(&req.tenant_id) {
            info!(tenant = %req.tenant_id, "Tenant deleted");
            DeleteTenantResponse {
                success: true,
                message: TENANT_DELETED.to_string(),
            }
        } else {
            DeleteTenantResponse {
                success: false,
                message: TENANT_NOT_FOUND.to_string(),
            }
        };
        metrics::record_tenant_count(self.store.tenant_count());
        timer.stop();

        Ok(Response::new(response))
    }
}
