pub mod authorization_code;
pub mod clients;
pub mod security;
pub mod tickets;
pub mod time;
pub mod upstream;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type AuthorizationCodeStorePort = dyn authorization_code::AuthorizationCodeStore;
pub type ClientRegistryPort = dyn clients::ClientRegistry;
pub type CodeGeneratorPort = dyn security::CodeGenerator;
pub type CredentialVerifierPort = dyn security::CredentialVerifier;
pub type TokenSignerPort = dyn security::TokenSigner;
pub type IdTokenVerifierPort = dyn security::IdTokenVerifier;
pub type ClockPort = dyn time::Clock;
pub type ProviderClientPort = dyn upstream::ProviderClient;
pub type ConsentStorePort = dyn tickets::TicketStore<tickets::PendingConsent>;
pub type LoginStorePort = dyn tickets::TicketStore<tickets::PendingLogin>;
