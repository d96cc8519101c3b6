use std::sync::Once;

pub mod convert;
pub mod http;
pub mod map;
pub mod text;

static RUSTLS_PROVIDER: Once = Once::new();

/// Installs the ring crypto provider for rustls, once per process.
///
/// reqwest is built with `rustls-no-provider`, so a provider has to be in
/// place before the first client is built.
pub fn ensure_rustls_crypto_provider() {
    RUSTLS_PROVIDER.call_once(|| {
        // Err means another provider was installed first, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
