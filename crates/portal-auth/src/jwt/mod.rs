//! Portal session tokens.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::SessionClaims;
pub use decoder::SessionTokenDecoder;
pub use encoder::SessionTokenEncoder;
