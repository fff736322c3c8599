use anchor_lang::prelude::*;
use crate::state::TileLedger;

#[derive(Accounts)]
pub struct SetApprovedMinter<'info> {
    /// Only the ledger authority can change the minter allow-list
    pub authority: Signer<'info>,

    #[account(mut)]
    pub ledger: Account<'info, TileLedger>,
}

pub fn handler(ctx: Context<SetApprovedMinter>, minter: Pubkey, approved: bool) -> Result<()> {
    ctx.accounts
        .ledger
        .set_approved_minter(&ctx.accounts.authority.key(), minter, approved)?;

    msg!(
        "Minter {} {}, {} approved minters",
        minter,
        if approved { "approved" } else { "revoked" },
        ctx.accounts.ledger.approved_minters.len()
    );
    Ok(())
}
