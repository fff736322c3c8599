use anchor_lang::prelude::*;
use crate::state::{MetadataProtocol, PdaStore, TileLedger};

/// Remaining accounts: the `MetadataProtocolAccount` PDA for `protocol_id`.
#[derive(Accounts)]
pub struct CreateMetadataProtocol<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    pub ledger: Account<'info, TileLedger>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, CreateMetadataProtocol<'info>>,
    protocol_id: u64,
    protocol: MetadataProtocol,
) -> Result<()> {
    msg!(
        "Registering metadata protocol {} owned by {}: create reward {}, update reward {}",
        protocol_id,
        protocol.protocol_owner,
        protocol.create_reward,
        protocol.update_reward
    );

    let mut store = PdaStore::new(
        ctx.accounts.ledger.key(),
        ctx.accounts.creator.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    ctx.accounts
        .ledger
        .create_metadata_protocol(&mut store, protocol_id, &protocol)
}
