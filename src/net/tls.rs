//! TLS certificate loading.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Load the certificate/key pair from PEM files.
///
/// Called before the listener binds so broken TLS material is a startup
/// failure, not something discovered on the first connection.
pub async fn load(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, std::io::Error> {
    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("certificate file not found: {}", cert_path.display()),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("private key file not found: {}", key_path.display()),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}
