use anchor_lang::prelude::*;
use crate::state::{PdaStore, TileLedger};

/// Entry point for approved minters: the sale, and the fixed-price and promo
/// utilities that compute their own pricing.
///
/// Remaining accounts, in any order: each key's `TileRecord`, the recipient's
/// `OwnerIndex` and the `OwnerSlot`s the new tiles will fill.
#[derive(Accounts)]
pub struct MintTiles<'info> {
    #[account(mut)]
    pub minter: Signer<'info>,

    #[account(mut)]
    pub ledger: Account<'info, TileLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, MintTiles<'info>>,
    to: Pubkey,
    keys: Vec<u64>,
) -> Result<()> {
    let mut store = PdaStore::new(
        ctx.accounts.ledger.key(),
        ctx.accounts.minter.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    let transfers = ctx
        .accounts
        .ledger
        .mint(&mut store, &ctx.accounts.minter.key(), to, &keys)?;

    for transfer in transfers {
        emit!(transfer);
    }

    msg!(
        "Minted {} tiles to {}, total supply {}",
        keys.len(),
        to,
        ctx.accounts.ledger.total_supply
    );
    Ok(())
}
