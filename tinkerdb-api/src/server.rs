//! gRPC server assembly and lifecycle

use std::sync::Arc;
use std::time::Duration;
use tinkerdb_core::config::ServerConfig;
use tinkerdb_core::shutdown::ShutdownCoordinator;
use tinkerdb_core::TenantRegistry;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::proto::kv_store_server::KvStoreServer;
use crate::proto::FILE_DESCRIPTOR_SET;
use crate::proto::tenant_admin_server::TenantAdminServer;
use crate::services::{KvStoreService, TenantAdminService};

/// Bind `config.bind_address` and serve until `shutdown` fires.
pub async fn serve(
    config: &ServerConfig,
    store: Arc<TenantRegistry>,
    shutdown: Arc<ShutdownCoordinator>,
) -> ApiResult<()> {
    let listener = TcpListener::bind(config.bind_address).await?;
    serve_with_listener(listener, config, store, shutdown).await
}

/// Serve the store, admin and reflection services on an already bound
/// listener.
///
/// Once `shutdown` fires the listener stops accepting and in-flight requests
/// get up to `config.shutdown_timeout` to finish before the server is
/// dropped.
pub async fn serve_with_listener(
    listener: TcpListener,
    config: &ServerConfig,
    store: Arc<TenantRegistry>,
    shutdown: Arc<ShutdownCoordinator>,
) -> ApiResult<()> {
    let local_addr = listener.local_addr()?;

    let kv = KvStoreServer::new(KvStoreService::new(store.clone()))
        .max_decoding_message_size(config.max_message_size)
        .max_encoding_message_size(config.max_message_size);
    let admin = TenantAdminServer::new(TenantAdminService::new(store))
        .max_decoding_message_size(config.max_message_size)
        .max_encoding_message_size(config.max_message_size);

    // v1alpha is still the only version older grpcurl releases ask for.
    let reflection_v1 = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;
    let reflection_v1alpha = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1alpha()?;

    let signal = {
        let shutdown = shutdown.clone();
        async move { shutdown.wait_for_shutdown().await }
    };

    info!("TinkerDB gRPC server listening on {}", local_addr);

    let server = Server::builder()
        .timeout(config.request_timeout)
        .concurrency_limit_per_connection(config.concurrency_limit_per_connection)
        .add_service(kv)
        .add_service(admin)
        .add_service(reflection_v1)
        .add_service(reflection_v1alpha)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal);
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = drain_deadline(&shutdown, config.shutdown_timeout) => {
            warn!(
                "In-flight requests did not finish within {:?}, stopping anyway",
                config.shutdown_timeout
            );
        }
    }

    info!("TinkerDB gRPC server stopped");
    Ok(())
}

async fn drain_deadline(shutdown: &ShutdownCoordinator, timeout: Duration) {
    shutdown.wait_for_shutdown().await;
    tokio::time::sleep(timeout).await;
}
