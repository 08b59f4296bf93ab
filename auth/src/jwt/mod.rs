pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Claims;
pub use claims::Subject;
pub use claims::TokenType;
pub use claims::ISSUER;
pub use codec::TokenCodec;
pub use errors::JwtError;
