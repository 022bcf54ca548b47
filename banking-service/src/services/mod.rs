pub mod bank_data;
pub mod bootstrap;
pub mod jwt;
pub mod policy;
pub mod repository;

pub use bank_data::BankDataClient;
pub use jwt::{JwtService, TokenClaims};
pub use policy::RolePolicy;
pub use repository::{PaymentRepository, UserRepository};
