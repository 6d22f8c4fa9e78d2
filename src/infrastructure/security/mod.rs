// src/infrastructure/security/mod.rs
pub mod authorization_code_store;
pub mod code;
pub mod password;
pub mod ticket_store;
pub mod token;
