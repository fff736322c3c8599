use anchor_lang::prelude::*;
use crate::state::Sale;

#[derive(Accounts)]
pub struct QuotePrice<'info> {
    pub sale: Account<'info, Sale>,
}

/// Area-weighted price of `keys` at the current clock, returned as
/// instruction return data.
pub fn handler(ctx: Context<QuotePrice>, keys: Vec<u64>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.sale.price(now, &keys)
}
