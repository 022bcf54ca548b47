pub mod payment;
pub mod role;
pub mod user;

pub use payment::{Payment, PaymentStatus};
pub use role::Role;
pub use user::User;
