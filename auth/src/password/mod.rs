pub mod argon2;
pub mod errors;
pub mod policy;
pub mod token;

pub use argon2::HashingCost;
pub use argon2::PasswordHasher;
pub use errors::PasswordError;
pub use policy::PasswordPolicy;
pub use token::digest_opaque_token;
pub use token::generate_opaque_token;
