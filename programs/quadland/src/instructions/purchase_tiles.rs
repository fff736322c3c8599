use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};
use crate::errors::QuadlandError;
use crate::state::{PdaStore, Sale, TileLedger};

/// Remaining accounts: the mint accounts of `MintTiles` for `beneficiary`,
/// plus the buyer's `Reservation` during the presale.
#[derive(Accounts)]
pub struct PurchaseTiles<'info> {
    #[account(mut)]
    pub buyer: Signer<'info>,

    #[account(mut, has_one = ledger @ QuadlandError::Unauthorized)]
    pub sale: Account<'info, Sale>,

    #[account(mut)]
    pub ledger: Account<'info, TileLedger>,

    /// Receives the purchase value
    #[account(mut, address = sale.config.wallet @ QuadlandError::Unauthorized)]
    pub wallet: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, PurchaseTiles<'info>>,
    keys: Vec<u64>,
    beneficiary: Pubkey,
    value: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let buyer = ctx.accounts.buyer.key();

    let mut store = PdaStore::new(
        ctx.accounts.ledger.key(),
        ctx.accounts.buyer.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    let purchase = ctx.accounts.sale.purchase(
        &mut ctx.accounts.ledger,
        &mut store,
        now,
        buyer,
        beneficiary,
        &keys,
        value,
    )?;

    require_keys_eq!(
        purchase.settlement.wallet,
        ctx.accounts.wallet.key(),
        QuadlandError::Unauthorized
    );
    transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.buyer.to_account_info(),
                to: ctx.accounts.wallet.to_account_info(),
            },
        ),
        purchase.settlement.lamports,
    )?;

    for tile in purchase.transfers {
        emit!(tile);
    }

    msg!(
        "Sold {} tiles to {} for {} lamports, {} raised",
        purchase.event.key_count,
        beneficiary,
        purchase.settlement.lamports,
        ctx.accounts.sale.value_raised
    );
    emit!(purchase.event);
    Ok(())
}
