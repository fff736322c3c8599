use anchor_lang::prelude::*;
use crate::state::Sale;

#[derive(Accounts)]
pub struct SaleHasEnded<'info> {
    pub sale: Account<'info, Sale>,
}

pub fn handler(ctx: Context<SaleHasEnded>) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;
    let ended = ctx.accounts.sale.has_ended(now);
    msg!("Sale phase: {:?}", ctx.accounts.sale.phase(now));
    Ok(ended)
}
