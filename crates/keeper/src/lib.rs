pub mod book;
pub mod config;
pub mod error;
pub mod keeper;

pub use book::{Book, BookTable, CollectionRecord};
pub use config::{create_example_config, LaunchpadConfig};
pub use error::{KeeperError, KeeperResult};
pub use keeper::{AuditReport, Keeper, MintReceipt};
