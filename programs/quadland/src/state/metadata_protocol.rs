use anchor_lang::prelude::*;

use crate::errors::QuadlandError;

/// Reward policy paying `reward_token` to tile owners who write metadata under
/// this protocol. Rewards are drawn from `reward_wallet`, which must have
/// delegated an allowance to the ledger's reward authority.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataProtocol {
    /// Paid when the tile had no metadata under this protocol yet
    pub create_reward: u64,
    /// Paid on every later write
    pub update_reward: u64,
    pub reward_wallet: Pubkey,
    pub protocol_owner: Pubkey,
    /// Mint of the reward token
    pub reward_token: Pubkey,
}

#[account]
#[derive(InitSpace, Debug)]
pub struct MetadataProtocolAccount {
    pub protocol_id: u64,
    pub protocol: MetadataProtocol,
}

impl MetadataProtocolAccount {
    pub const SEED: &'static [u8] = b"metadata_protocol";
}

/// Token accounts offered to pay one reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardAccounts {
    pub mint: Pubkey,
    pub source_mint: Pubkey,
    pub source_owner: Pubkey,
    pub destination_mint: Pubkey,
    pub destination_owner: Pubkey,
}

impl MetadataProtocol {
    /// The source must be the reward wallet's account and the destination
    /// `recipient`'s, both in the reward mint.
    pub fn check_reward_accounts(
        &self,
        recipient: &Pubkey,
        accounts: Option<&RewardAccounts>,
    ) -> Result<()> {
        let accounts = accounts.ok_or(QuadlandError::MissingRewardAccounts)?;

        require_keys_eq!(accounts.mint, self.reward_token, QuadlandError::RewardAccountMismatch);
        require_keys_eq!(
            accounts.source_mint,
            self.reward_token,
            QuadlandError::RewardAccountMismatch
        );
        require_keys_eq!(
            accounts.source_owner,
            self.reward_wallet,
            QuadlandError::RewardAccountMismatch
        );
        require_keys_eq!(
            accounts.destination_mint,
            self.reward_token,
            QuadlandError::RewardAccountMismatch
        );
        require_keys_eq!(
            accounts.destination_owner,
            *recipient,
            QuadlandError::RewardAccountMismatch
        );
        Ok(())
    }
}

/// Moves reward tokens on behalf of the ledger.
///
/// On chain this is an SPL `transfer_checked` signed by the reward authority
/// PDA; any failure must be returned so the metadata write is abandoned.
pub trait RewardTransfer {
    fn transfer_reward(
        &mut self,
        protocol: &MetadataProtocol,
        recipient: &Pubkey,
        amount: u64,
    ) -> Result<()>;
}
