use crate::domain::client::RegisteredClient;

pub trait ClientRegistry: Send + Sync {
    fn find(&self, client_id: &str) -> Option<RegisteredClient>;
}
