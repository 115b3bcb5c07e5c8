//! Server state

use std::sync::Arc;

use crate::http::api::PlatformApi;
use crate::validation::engine::ValidationEngine;
use crate::webhook::verify::SignatureVerifier;

/// Server state shared across handlers
pub struct ServerState {
    pub verifier: SignatureVerifier,
    pub platform: Arc<dyn PlatformApi>,
    pub engine: ValidationEngine,
}

impl ServerState {
    pub fn new(
        verifier: SignatureVerifier,
        platform: Arc<dyn PlatformApi>,
        engine: ValidationEngine,
    ) -> Self {
        Self {
            verifier,
            platform,
            engine,
        }
    }
}
