pub mod password_reset;
pub mod email_verification;

pub use password_reset::{PasswordResetWorkflow, PasswordResetConfig, PasswordResetRequest, PasswordResetConfirmation};
pub use email_verification::{EmailVerificationWorkflow, EmailVerificationConfig, EmailVerificationRequest, EmailVerificationConfirmation};