use anchor_lang::prelude::*;
use crate::state::{MetadataProtocol, PdaStore, TileLedger};

#[derive(Accounts)]
pub struct UpdateReward<'info> {
    /// Current owner of the protocol
    #[account(mut)]
    pub protocol_owner: Signer<'info>,

    pub ledger: Account<'info, TileLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, UpdateReward<'info>>,
    protocol_id: u64,
    protocol: MetadataProtocol,
) -> Result<()> {
    let mut store = PdaStore::new(
        ctx.accounts.ledger.key(),
        ctx.accounts.protocol_owner.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    ctx.accounts.ledger.update_reward(
        &mut store,
        &ctx.accounts.protocol_owner.key(),
        protocol_id,
        &protocol,
    )?;

    msg!(
        "Updated protocol {} rewards to {} / {}",
        protocol_id,
        protocol.create_reward,
        protocol.update_reward
    );
    Ok(())
}
