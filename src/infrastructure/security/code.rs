// src/infrastructure/security/code.rs
use crate::application::ports::security::CodeGenerator;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};

/// 32 bytes from the OS RNG, base64url without padding (43 characters).
#[derive(Default, Clone)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate_code(&self) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_url_safe_and_distinct() {
        let generator = RandomCodeGenerator;
        let codes: HashSet<String> = (0..64).map(|_| generator.generate_code()).collect();
        assert_eq!(codes.len(), 64);
        for code in &codes {
            assert_eq!(code.len(), 43);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }
}
