pub mod encryption;
pub mod hashing;
pub mod jwt;
pub mod totp;

pub use encryption::EncryptionService;
pub use hashing::PasswordHasher;
pub use jwt::{JwtService, TokenPair};
pub use totp::TotpService;