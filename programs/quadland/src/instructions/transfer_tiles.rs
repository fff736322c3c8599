use anchor_lang::prelude::*;
use crate::state::{PdaStore, TileLedger};

/// Remaining accounts: each key's `TileRecord`, the `OwnerIndex` of `from`
/// and `to`, and every `OwnerSlot` the swap-removes and appends touch.
#[derive(Accounts)]
pub struct TransferTiles<'info> {
    /// Either `from` itself or the approved operator of every tile
    #[account(mut)]
    pub caller: Signer<'info>,

    pub ledger: Account<'info, TileLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, TransferTiles<'info>>,
    from: Pubkey,
    to: Pubkey,
    keys: Vec<u64>,
) -> Result<()> {
    let mut store = PdaStore::new(
        ctx.accounts.ledger.key(),
        ctx.accounts.caller.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    let transfers = ctx.accounts.ledger.transfer_many(
        &mut store,
        &ctx.accounts.caller.key(),
        from,
        to,
        &keys,
    )?;

    for transfer in transfers {
        emit!(transfer);
    }

    msg!("Transferred {} tiles from {} to {}", keys.len(), from, to);
    Ok(())
}
