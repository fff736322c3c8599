use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod state;
pub mod utils;
pub mod instructions;

use instructions::*;
use state::{MetadataProtocol, SaleConfig};

declare_id!("3fZrt2EFE4RHZkVDAe5qMKQN2WWkuaLy5zZskSXfqb7J");

#[program]
pub mod quadland {
    use super::*;

    pub fn create_ledger(ctx: Context<CreateLedger>) -> Result<()> {
        instructions::create_ledger::handler(ctx)
    }

    pub fn update_ledger_config(
        ctx: Context<UpdateLedgerConfig>,
        minting_enabled: Option<bool>,
        new_authority: Option<Pubkey>,
    ) -> Result<()> {
        instructions::update_ledger_config::handler(ctx, minting_enabled, new_authority)
    }

    pub fn set_approved_minter(
        ctx: Context<SetApprovedMinter>,
        minter: Pubkey,
        approved: bool,
    ) -> Result<()> {
        instructions::set_approved_minter::handler(ctx, minter, approved)
    }

    pub fn mint_tiles<'info>(
        ctx: Context<'_, '_, 'info, 'info, MintTiles<'info>>,
        to: Pubkey,
        keys: Vec<u64>,
    ) -> Result<()> {
        instructions::mint_tiles::handler(ctx, to, keys)
    }

    pub fn transfer_tiles<'info>(
        ctx: Context<'_, '_, 'info, 'info, TransferTiles<'info>>,
        from: Pubkey,
        to: Pubkey,
        keys: Vec<u64>,
    ) -> Result<()> {
        instructions::transfer_tiles::handler(ctx, from, to, keys)
    }

    pub fn approve_tiles<'info>(
        ctx: Context<'_, '_, 'info, 'info, ApproveTiles<'info>>,
        operator: Pubkey,
        keys: Vec<u64>,
    ) -> Result<()> {
        instructions::approve_tiles::handler(ctx, operator, keys)
    }

    pub fn create_metadata_protocol<'info>(
        ctx: Context<'_, '_, 'info, 'info, CreateMetadataProtocol<'info>>,
        protocol_id: u64,
        protocol: MetadataProtocol,
    ) -> Result<()> {
        instructions::create_metadata_protocol::handler(ctx, protocol_id, protocol)
    }

    pub fn update_reward<'info>(
        ctx: Context<'_, '_, 'info, 'info, UpdateReward<'info>>,
        protocol_id: u64,
        protocol: MetadataProtocol,
    ) -> Result<()> {
        instructions::update_reward::handler(ctx, protocol_id, protocol)
    }

    pub fn update_tile_metadata<'info>(
        ctx: Context<'_, '_, 'info, 'info, UpdateTileMetadata<'info>>,
        protocol_id: u64,
        keys: Vec<u64>,
        text: String,
    ) -> Result<()> {
        instructions::update_tile_metadata::handler(ctx, protocol_id, keys, text)
    }

    pub fn create_sale(ctx: Context<CreateSale>, config: SaleConfig) -> Result<()> {
        instructions::create_sale::handler(ctx, config)
    }

    pub fn reserve_spot<'info>(
        ctx: Context<'_, '_, 'info, 'info, ReserveSpot<'info>>,
    ) -> Result<()> {
        instructions::reserve_spot::handler(ctx)
    }

    pub fn purchase_tiles<'info>(
        ctx: Context<'_, '_, 'info, 'info, PurchaseTiles<'info>>,
        keys: Vec<u64>,
        beneficiary: Pubkey,
        value: u64,
    ) -> Result<()> {
        instructions::purchase_tiles::handler(ctx, keys, beneficiary, value)
    }

    pub fn quote_price(ctx: Context<QuotePrice>, keys: Vec<u64>) -> Result<u64> {
        instructions::quote_price::handler(ctx, keys)
    }

    pub fn sale_has_ended(ctx: Context<SaleHasEnded>) -> Result<bool> {
        instructions::sale_has_ended::handler(ctx)
    }
}
