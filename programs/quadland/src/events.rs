use anchor_lang::prelude::*;

/// One per tile on mint (`from: None`) and on transfer.
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileTransferred {
    pub from: Option<Pubkey>,
    pub to: Pubkey,
    pub key: u64,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataUpdated {
    pub protocol_id: u64,
    pub key: u64,
    pub owner: Pubkey,
    pub text: String,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationMade {
    pub sale: Pubkey,
    pub caller: Pubkey,
    pub reserved_count: u32,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilesPurchased {
    pub sale: Pubkey,
    pub caller: Pubkey,
    pub beneficiary: Pubkey,
    pub value: u64,
    pub key_count: u32,
}
