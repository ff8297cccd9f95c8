pub mod credentials;
pub mod drive;

pub use credentials::{CredentialStore, SqliteCredentialStore, StaticCredentialStore};
pub use drive::DriveClient;
