use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    self, Mint as InterfaceMint, TokenAccount as InterfaceTokenAccount, TokenInterface,
};
use crate::errors::QuadlandError;
use crate::state::{
    MetadataProtocol, PdaStore, RewardAccounts, RewardTransfer, TileLedger, REWARD_AUTHORITY_SEED,
};

/// Writes protocol metadata on tiles owned by `owner`.
///
/// The reward accounts are only needed when the protocol is registered and
/// owes a non-zero reward. The reward wallet pays through an SPL allowance it
/// delegated to the `reward_authority` PDA.
///
/// Remaining accounts: the protocol's `MetadataProtocolAccount`, and for each
/// key its `TileRecord` and `TileMetadata`.
#[derive(Accounts)]
pub struct UpdateTileMetadata<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    pub ledger: Account<'info, TileLedger>,

    /// CHECK: PDA used only as the delegate signing reward transfers
    #[account(
        seeds = [REWARD_AUTHORITY_SEED, ledger.key().as_ref()],
        bump = ledger.reward_authority_bump
    )]
    pub reward_authority: UncheckedAccount<'info>,

    pub reward_mint: Option<InterfaceAccount<'info, InterfaceMint>>,

    /// Token account of the protocol's reward wallet
    #[account(mut)]
    pub reward_source: Option<InterfaceAccount<'info, InterfaceTokenAccount>>,

    /// Owner's token account receiving the reward
    #[account(mut)]
    pub owner_reward_account: Option<InterfaceAccount<'info, InterfaceTokenAccount>>,

    pub token_program: Option<Interface<'info, TokenInterface>>,

    pub system_program: Program<'info, System>,
}

struct SplRewardTransfer<'a, 'info> {
    authority: &'a UncheckedAccount<'info>,
    mint: Option<&'a InterfaceAccount<'info, InterfaceMint>>,
    source: Option<&'a InterfaceAccount<'info, InterfaceTokenAccount>>,
    destination: Option<&'a InterfaceAccount<'info, InterfaceTokenAccount>>,
    token_program: Option<&'a Interface<'info, TokenInterface>>,
    signer_seeds: &'a [&'a [&'a [u8]]],
}

impl SplRewardTransfer<'_, '_> {
    fn reward_accounts(&self) -> Option<RewardAccounts> {
        let (mint, source, destination, _) =
            (self.mint?, self.source?, self.destination?, self.token_program?);
        Some(RewardAccounts {
            mint: mint.key(),
            source_mint: source.mint,
            source_owner: source.owner,
            destination_mint: destination.mint,
            destination_owner: destination.owner,
        })
    }
}

impl RewardTransfer for SplRewardTransfer<'_, '_> {
    fn transfer_reward(
        &mut self,
        protocol: &MetadataProtocol,
        recipient: &Pubkey,
        amount: u64,
    ) -> Result<()> {
        protocol.check_reward_accounts(recipient, self.reward_accounts().as_ref())?;
        let (Some(mint), Some(source), Some(destination), Some(token_program)) =
            (self.mint, self.source, self.destination, self.token_program)
        else {
            return err!(QuadlandError::MissingRewardAccounts);
        };

        let cpi_accounts = token_interface::TransferChecked {
            from: source.to_account_info(),
            mint: mint.to_account_info(),
            to: destination.to_account_info(),
            authority: self.authority.to_account_info(),
        };
        token_interface::transfer_checked(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                cpi_accounts,
                self.signer_seeds,
            ),
            amount,
            mint.decimals,
        )?;

        msg!("Paid {} reward tokens to {}", amount, recipient);
        Ok(())
    }
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, UpdateTileMetadata<'info>>,
    protocol_id: u64,
    keys: Vec<u64>,
    text: String,
) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let ledger_key = ctx.accounts.ledger.key();
    let bump = ctx.accounts.ledger.reward_authority_bump;
    let seeds: &[&[u8]] = &[REWARD_AUTHORITY_SEED, ledger_key.as_ref(), &[bump]];
    let signer_seeds: &[&[&[u8]]] = &[seeds];

    let accounts = &*ctx.accounts;
    let mut store = PdaStore::new(
        ledger_key,
        accounts.owner.to_account_info(),
        accounts.system_program.to_account_info(),
        ctx.remaining_accounts,
    );
    let mut rewards = SplRewardTransfer {
        authority: &accounts.reward_authority,
        mint: accounts.reward_mint.as_ref(),
        source: accounts.reward_source.as_ref(),
        destination: accounts.owner_reward_account.as_ref(),
        token_program: accounts.token_program.as_ref(),
        signer_seeds,
    };

    let updates = accounts.ledger.update_many_token_metadata(
        &mut store,
        &owner,
        protocol_id,
        &keys,
        &text,
        &mut rewards,
    )?;

    for update in updates {
        emit!(update);
    }

    msg!(
        "Updated protocol {} metadata on {} tiles",
        protocol_id,
        keys.len()
    );
    Ok(())
}
