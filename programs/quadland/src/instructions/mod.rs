#![allow(ambiguous_glob_reexports)]

pub mod create_ledger;
pub mod update_ledger_config;
pub mod set_approved_minter;
pub mod mint_tiles;
pub mod transfer_tiles;
pub mod approve_tiles;
pub mod create_metadata_protocol;
pub mod update_reward;
pub mod update_tile_metadata;
pub mod create_sale;
pub mod reserve_spot;
pub mod purchase_tiles;
pub mod quote_price;
pub mod sale_has_ended;

pub use create_ledger::*;
pub use update_ledger_config::*;
pub use set_approved_minter::*;
pub use mint_tiles::*;
pub use transfer_tiles::*;
pub use approve_tiles::*;
pub use create_metadata_protocol::*;
pub use update_reward::*;
pub use update_tile_metadata::*;
pub use create_sale::*;
pub use reserve_spot::*;
pub use purchase_tiles::*;
pub use quote_price::*;
pub use sale_has_ended::*;
