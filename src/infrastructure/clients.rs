// src/infrastructure/clients.rs
use crate::application::ports::clients::ClientRegistry;
use crate::domain::client::RegisteredClient;
use std::collections::HashMap;

/// Client registrations fixed at startup from configuration.
#[derive(Debug, Default, Clone)]
pub struct StaticClientRegistry {
    clients: HashMap<String, RegisteredClient>,
}

impl StaticClientRegistry {
    pub fn new(clients: impl IntoIterator<Item = RegisteredClient>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|client| (client.client_id.clone(), client))
                .collect(),
        }
    }
}

impl ClientRegistry for StaticClientRegistry {
    fn find(&self, client_id: &str) -> Option<RegisteredClient> {
        self.clients.get(client_id).cloned()
    }
}
