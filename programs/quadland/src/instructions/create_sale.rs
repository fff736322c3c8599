use anchor_lang::prelude::*;
use crate::errors::QuadlandError;
use crate::state::{Sale, SaleConfig, TileLedger};

/// The sale signs mints with its own address, so the ledger authority must
/// approve `sale` as a minter before purchases can succeed.
#[derive(Accounts)]
pub struct CreateSale<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(has_one = authority @ QuadlandError::Unauthorized)]
    pub ledger: Account<'info, TileLedger>,

    #[account(
        init,
        payer = authority,
        space = 8 + Sale::INIT_SPACE
    )]
    pub sale: Account<'info, Sale>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateSale>, config: SaleConfig) -> Result<()> {
    let sale_key = ctx.accounts.sale.key();
    let sale = Sale::new(
        ctx.accounts.authority.key(),
        ctx.accounts.ledger.key(),
        sale_key,
        config,
    )?;

    msg!(
        "Sale {} created: {} to {} lamports between {} and {}",
        sale_key,
        sale.config.curve.start_price,
        sale.config.curve.end_price,
        sale.config.curve.start_time,
        sale.config.curve.end_time
    );

    ctx.accounts.sale.set_inner(sale);
    Ok(())
}
