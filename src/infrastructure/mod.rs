pub mod clients;
pub mod http_client;
pub mod security;
pub mod time;
