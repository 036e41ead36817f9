pub mod password_reset;
pub mod user;

pub use password_reset::PostgresPasswordResetRepository;
pub use user::PostgresUserRepository;
