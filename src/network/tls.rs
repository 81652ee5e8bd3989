//! Client TLS handshake.

use crate::error::ConnectionFailure;
use std::sync::Arc;
use talkback_proto::transport::Transport;
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

/// Root store built from the platform's trusted certificates.
fn platform_roots() -> RootCertStore {
    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        warn!(error = %err, "Failed to load a platform certificate");
    }
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    debug!(added, ignored, "Loaded platform root certificates");
    roots
}

/// Wrap `stream` in TLS, verifying the server as `host`.
pub async fn handshake(host: &str, stream: TcpStream) -> Result<Transport, ConnectionFailure> {
    let server_name = ServerName::try_from(host.to_owned())
        .map_err(|_| ConnectionFailure::InvalidServerName(host.to_owned()))?;

    let config = ClientConfig::builder()
        .with_root_certificates(platform_roots())
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));

    let tls_stream = connector
        .connect(server_name, stream)
        .await
        .map_err(|source| ConnectionFailure::Tls {
            host: host.to_owned(),
            source,
        })?;

    Ok(Transport::client_tls(tls_stream))
}
