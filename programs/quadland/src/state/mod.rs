pub mod metadata_protocol;
pub mod sale;
pub mod tile_accounts;
pub mod tile_ledger;
pub mod tile_store;

pub use metadata_protocol::*;
pub use sale::*;
pub use tile_accounts::*;
pub use tile_ledger::*;
pub use tile_store::*;
