use anchor_lang::prelude::*;
use crate::state::TileLedger;

#[derive(Accounts)]
pub struct UpdateLedgerConfig<'info> {
    pub authority: Signer<'info>,

    #[account(mut)]
    pub ledger: Account<'info, TileLedger>,
}

pub fn handler(
    ctx: Context<UpdateLedgerConfig>,
    minting_enabled: Option<bool>,
    new_authority: Option<Pubkey>,
) -> Result<()> {
    ctx.accounts.ledger.update_config(
        &ctx.accounts.authority.key(),
        minting_enabled,
        new_authority,
    )?;

    if let Some(enabled) = minting_enabled {
        msg!("Updated minting_enabled to {}", enabled);
    }

    if let Some(authority) = new_authority {
        msg!("Updated ledger authority to {}", authority);
    }

    Ok(())
}
