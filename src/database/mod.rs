pub mod manager;
pub mod models;
pub mod profiles;

pub use manager::DatabaseError;
pub use profiles::{ListEncoding, PgProfileStore, ProfileStore, StoreError};
