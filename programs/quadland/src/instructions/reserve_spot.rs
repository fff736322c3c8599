use anchor_lang::prelude::*;
use crate::state::{PdaStore, Sale};

/// Remaining accounts: the reserver's `Reservation` PDA, `[reservation, sale, reserver]`.
#[derive(Accounts)]
pub struct ReserveSpot<'info> {
    #[account(mut)]
    pub reserver: Signer<'info>,

    #[account(mut)]
    pub sale: Account<'info, Sale>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, ReserveSpot<'info>>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let mut store = PdaStore::new(
        ctx.accounts.sale.ledger,
        ctx.accounts.reserver.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    let reservation = ctx
        .accounts
        .sale
        .reserve_spot(&mut store, now, ctx.accounts.reserver.key())?;

    msg!(
        "Reserved presale spot for {} ({} reserved)",
        reservation.caller,
        reservation.reserved_count
    );
    emit!(reservation);
    Ok(())
}
