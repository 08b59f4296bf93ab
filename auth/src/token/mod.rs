pub mod errors;
pub mod manager;

pub use errors::AuthError;
pub use manager::TokenManager;
pub use manager::TokenPair;
