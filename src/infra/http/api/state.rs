use std::sync::Arc;

use crate::{
    application::{reference::ReferenceStore, resolver::ResponseResolver},
    cache::CacheAside,
};

#[derive(Clone)]
pub struct ApiState {
    pub resolver: ResponseResolver,
    pub cache: CacheAside,
}

impl ApiState {
    pub fn new(store: Arc<ReferenceStore>, cache: CacheAside) -> Self {
        Self {
            resolver: ResponseResolver::new(store),
            cache,
        }
    }
}
