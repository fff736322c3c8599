use anchor_lang::prelude::*;

pub const MAX_METADATA_LEN: usize = 256;

/// One PDA per minted tile, seeded by the ledger and the quadkey.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct TileRecord {
    pub key: u64,
    pub owner: Pubkey,
    /// Slot of this key in its owner's enumeration
    pub index: u64,
    /// Operator allowed to transfer this tile, cleared on transfer
    pub approved: Option<Pubkey>,
}

impl TileRecord {
    pub const SEED: &'static [u8] = b"tile";
}

/// Number of tiles an owner holds. Slots at or past `count` are stale.
#[account]
#[derive(InitSpace, Debug)]
pub struct OwnerIndex {
    pub owner: Pubkey,
    pub count: u64,
}

impl OwnerIndex {
    pub const SEED: &'static [u8] = b"owner_index";
}

/// `[owner, index]` enumeration slot. Slots are reused after a swap-remove
/// instead of being closed.
#[account]
#[derive(InitSpace, Debug)]
pub struct OwnerSlot {
    pub owner: Pubkey,
    pub index: u64,
    pub key: u64,
}

impl OwnerSlot {
    pub const SEED: &'static [u8] = b"owner_slot";
}

#[account]
#[derive(InitSpace, Debug)]
pub struct TileMetadata {
    pub protocol_id: u64,
    pub key: u64,
    #[max_len(256)]
    pub text: String,
}

impl TileMetadata {
    pub const SEED: &'static [u8] = b"tile_metadata";
}

/// Presale spot held by `reserver`; its existence is the reservation.
#[account]
#[derive(InitSpace, Debug)]
pub struct Reservation {
    pub sale: Pubkey,
    pub reserver: Pubkey,
}

impl Reservation {
    pub const SEED: &'static [u8] = b"reservation";
}
