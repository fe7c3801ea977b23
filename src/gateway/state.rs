use std::sync::Arc;

use crate::service::EmbeddingService;

#[derive(Clone)]
pub struct HandlerState {
    pub service: Arc<EmbeddingService>,
}

impl HandlerState {
    pub fn new(service: EmbeddingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
