use anchor_lang::prelude::*;
use crate::state::{PdaStore, TileLedger};

/// Remaining accounts: the `TileRecord` PDA of every key.
#[derive(Accounts)]
pub struct ApproveTiles<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    pub ledger: Account<'info, TileLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, ApproveTiles<'info>>,
    operator: Pubkey,
    keys: Vec<u64>,
) -> Result<()> {
    let mut store = PdaStore::new(
        ctx.accounts.ledger.key(),
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    ctx.accounts
        .ledger
        .approve_many(&mut store, &ctx.accounts.owner.key(), operator, &keys)?;

    msg!("Approved {} for {} tiles", operator, keys.len());
    Ok(())
}
