// src/presentation/http/state.rs
use crate::application::services::{ProviderServices, RelyingPartyService};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProviderState {
    pub services: Arc<ProviderServices>,
}

#[derive(Clone)]
pub struct RelyingPartyState {
    pub relying_party: Arc<RelyingPartyService>,
}
