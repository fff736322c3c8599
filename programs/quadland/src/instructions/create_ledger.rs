use anchor_lang::prelude::*;
use crate::state::{TileLedger, REWARD_AUTHORITY_SEED};

/// The ledger is a fixed-size keypair account. Tiles, owner slots, protocols
/// and metadata are PDAs seeded by its address, created as they are first
/// written.
#[derive(Accounts)]
pub struct CreateLedger<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + TileLedger::INIT_SPACE
    )]
    pub ledger: Account<'info, TileLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateLedger>) -> Result<()> {
    let ledger_key = ctx.accounts.ledger.key();
    let (reward_authority, bump) = Pubkey::find_program_address(
        &[REWARD_AUTHORITY_SEED, ledger_key.as_ref()],
        ctx.program_id,
    );

    ctx.accounts
        .ledger
        .initialize(ctx.accounts.authority.key(), bump);

    msg!(
        "Ledger initialized at {} with reward authority {}",
        ledger_key,
        reward_authority
    );
    Ok(())
}
