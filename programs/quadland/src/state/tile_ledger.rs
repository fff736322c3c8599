use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::errors::QuadlandError;
use crate::events::{MetadataUpdated, TileTransferred};
use crate::state::{MetadataProtocol, RewardTransfer, TileRecord, TileStore, MAX_METADATA_LEN};
use crate::utils::Quadkey;

pub const REWARD_AUTHORITY_SEED: &[u8] = b"reward_authority";
pub const MAX_APPROVED_MINTERS: usize = 16;

/// Tile ledger configuration and supply counter.
///
/// Tiles, owner enumeration, protocols and metadata live in their own PDAs
/// seeded by this account's address; the ledger methods reach them through a
/// `TileStore`.
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct TileLedger {
    pub authority: Pubkey,
    /// Lets `authority` mint directly; approved minters are not affected
    pub minting_enabled: bool,
    #[max_len(16)]
    pub approved_minters: Vec<Pubkey>,
    pub reward_authority_bump: u8,
    pub total_supply: u64,
}

impl TileLedger {
    pub fn initialize(&mut self, authority: Pubkey, reward_authority_bump: u8) {
        *self = TileLedger {
            authority,
            reward_authority_bump,
            ..TileLedger::default()
        };
    }

    pub fn update_config(
        &mut self,
        caller: &Pubkey,
        minting_enabled: Option<bool>,
        new_authority: Option<Pubkey>,
    ) -> Result<()> {
        require!(*caller == self.authority, QuadlandError::Unauthorized);

        if let Some(enabled) = minting_enabled {
            self.minting_enabled = enabled;
        }
        if let Some(authority) = new_authority {
            self.authority = authority;
        }
        Ok(())
    }

    pub fn set_approved_minter(
        &mut self,
        caller: &Pubkey,
        minter: Pubkey,
        approved: bool,
    ) -> Result<()> {
        require!(*caller == self.authority, QuadlandError::Unauthorized);

        let listed = self.is_approved_minter(&minter);
        if approved && !listed {
            require!(
                self.approved_minters.len() < MAX_APPROVED_MINTERS,
                QuadlandError::TooManyMinters
            );
            self.approved_minters.push(minter);
        } else if !approved && listed {
            self.approved_minters.retain(|m| *m != minter);
        }
        Ok(())
    }

    pub fn is_approved_minter(&self, who: &Pubkey) -> bool {
        self.approved_minters.contains(who)
    }

    pub fn can_mint(&self, caller: &Pubkey) -> bool {
        self.is_approved_minter(caller) || (self.minting_enabled && *caller == self.authority)
    }

    /// Mint every key to `to`, or none of them.
    pub fn mint<S: TileStore>(
        &mut self,
        store: &mut S,
        caller: &Pubkey,
        to: Pubkey,
        keys: &[u64],
    ) -> Result<Vec<TileTransferred>> {
        require!(self.can_mint(caller), QuadlandError::Unauthorized);
        require!(!keys.is_empty(), QuadlandError::EmptyBatch);

        let mut seen = BTreeSet::new();
        for &key in keys {
            Quadkey::from_key(key)?;
            require!(seen.insert(key), QuadlandError::DuplicateKey);
            require!(store.tile(key)?.is_none(), QuadlandError::TileAlreadyOwned);
        }
        let total_supply = self
            .total_supply
            .checked_add(keys.len() as u64)
            .ok_or(QuadlandError::Overflow)?;

        let mut events = Vec::with_capacity(keys.len());
        for &key in keys {
            attach(store, to, key)?;
            events.push(TileTransferred { from: None, to, key });
        }
        self.total_supply = total_supply;

        Ok(events)
    }

    /// Move every key from `from` to `to`. The caller must be `from` or the
    /// approved operator of each key.
    pub fn transfer_many<S: TileStore>(
        &self,
        store: &mut S,
        caller: &Pubkey,
        from: Pubkey,
        to: Pubkey,
        keys: &[u64],
    ) -> Result<Vec<TileTransferred>> {
        require!(!keys.is_empty(), QuadlandError::EmptyBatch);

        let mut seen = BTreeSet::new();
        for &key in keys {
            require!(seen.insert(key), QuadlandError::DuplicateKey);
            let record = store.tile(key)?.ok_or(QuadlandError::TileNotFound)?;
            require!(record.owner == from, QuadlandError::NotTileOwner);
            require!(
                *caller == from || record.approved == Some(*caller),
                QuadlandError::Unauthorized
            );
        }

        let mut events = Vec::with_capacity(keys.len());
        for &key in keys {
            // re-read: an earlier swap-remove may have moved this key's slot
            let record = store.tile(key)?.ok_or(QuadlandError::TileNotFound)?;
            detach(store, &record)?;
            attach(store, to, key)?;
            events.push(TileTransferred {
                from: Some(from),
                to,
                key,
            });
        }
        Ok(events)
    }

    pub fn approve_many<S: TileStore>(
        &self,
        store: &mut S,
        caller: &Pubkey,
        operator: Pubkey,
        keys: &[u64],
    ) -> Result<()> {
        require!(!keys.is_empty(), QuadlandError::EmptyBatch);

        let mut records = Vec::with_capacity(keys.len());
        for &key in keys {
            let record = store.tile(key)?.ok_or(QuadlandError::TileNotFound)?;
            require!(record.owner == *caller, QuadlandError::Unauthorized);
            records.push(record);
        }
        for mut record in records {
            record.approved = Some(operator);
            store.put_tile(&record)?;
        }
        Ok(())
    }

    /// Fingerprint of a strictly increasing id sequence.
    pub fn unique_group_id(ids: &[u64]) -> Result<[u8; 32]> {
        require!(!ids.is_empty(), QuadlandError::EmptyBatch);
        require!(
            ids.windows(2).all(|pair| pair[0] < pair[1]),
            QuadlandError::UnorderedGroup
        );

        let mut hasher = blake3::Hasher::new();
        for id in ids {
            hasher.update(&id.to_le_bytes());
        }
        Ok(*hasher.finalize().as_bytes())
    }

    pub fn create_metadata_protocol<S: TileStore>(
        &self,
        store: &mut S,
        id: u64,
        protocol: &MetadataProtocol,
    ) -> Result<()> {
        require!(store.protocol(id)?.is_none(), QuadlandError::ProtocolExists);
        store.put_protocol(id, protocol)
    }

    pub fn update_reward<S: TileStore>(
        &self,
        store: &mut S,
        caller: &Pubkey,
        id: u64,
        protocol: &MetadataProtocol,
    ) -> Result<()> {
        let current = store.protocol(id)?.ok_or(QuadlandError::UnknownProtocol)?;
        require!(
            *caller == current.protocol_owner,
            QuadlandError::Unauthorized
        );
        store.put_protocol(id, protocol)
    }

    pub fn update_token_metadata<S: TileStore, R: RewardTransfer>(
        &self,
        store: &mut S,
        caller: &Pubkey,
        protocol_id: u64,
        key: u64,
        text: &str,
        rewards: &mut R,
    ) -> Result<MetadataUpdated> {
        let mut events =
            self.update_many_token_metadata(store, caller, protocol_id, &[key], text, rewards)?;
        events.pop().ok_or_else(|| error!(QuadlandError::EmptyBatch))
    }

    /// Write `text` on every key. The summed reward is paid in one transfer
    /// before anything is stored.
    pub fn update_many_token_metadata<S: TileStore, R: RewardTransfer>(
        &self,
        store: &mut S,
        caller: &Pubkey,
        protocol_id: u64,
        keys: &[u64],
        text: &str,
        rewards: &mut R,
    ) -> Result<Vec<MetadataUpdated>> {
        require!(!keys.is_empty(), QuadlandError::EmptyBatch);
        require!(!text.is_empty(), QuadlandError::EmptyMetadata);
        require!(text.len() <= MAX_METADATA_LEN, QuadlandError::MetadataTooLong);

        let protocol = store.protocol(protocol_id)?;
        let mut seen = BTreeSet::new();
        let mut reward = 0u64;
        for &key in keys {
            require!(seen.insert(key), QuadlandError::DuplicateKey);
            let record = store.tile(key)?.ok_or(QuadlandError::TileNotFound)?;
            require!(record.owner == *caller, QuadlandError::Unauthorized);

            if let Some(protocol) = &protocol {
                let amount = if store.token_metadata(protocol_id, key)?.is_empty() {
                    protocol.create_reward
                } else {
                    protocol.update_reward
                };
                reward = reward.checked_add(amount).ok_or(QuadlandError::Overflow)?;
            }
        }

        if let Some(protocol) = &protocol {
            if reward > 0 {
                rewards.transfer_reward(protocol, caller, reward)?;
            }
        }

        let mut events = Vec::with_capacity(keys.len());
        for &key in keys {
            store.put_metadata(protocol_id, key, text)?;
            events.push(MetadataUpdated {
                protocol_id,
                key,
                owner: *caller,
                text: text.to_string(),
            });
        }
        Ok(events)
    }
}

fn attach<S: TileStore>(store: &mut S, owner: Pubkey, key: u64) -> Result<()> {
    let index = store.owner_count(&owner)?;
    let count = index.checked_add(1).ok_or(QuadlandError::Overflow)?;
    store.put_owner_slot(&owner, index, key)?;
    store.put_owner_count(&owner, count)?;
    store.put_tile(&TileRecord {
        key,
        owner,
        index,
        approved: None,
    })
}

/// Swap-remove `record.key` from its owner's enumeration: the last slot moves
/// into the vacated one.
fn detach<S: TileStore>(store: &mut S, record: &TileRecord) -> Result<()> {
    let count = store.owner_count(&record.owner)?;
    let last = count
        .checked_sub(1)
        .ok_or(QuadlandError::IndexOutOfBounds)?;
    require!(record.index <= last, QuadlandError::IndexOutOfBounds);

    if record.index != last {
        let moved = store
            .owner_slot(&record.owner, last)?
            .ok_or(QuadlandError::IndexOutOfBounds)?;
        let mut moved_record = store.tile(moved)?.ok_or(QuadlandError::TileNotFound)?;
        moved_record.index = record.index;
        store.put_owner_slot(&record.owner, record.index, moved)?;
        store.put_tile(&moved_record)?;
    }
    store.put_owner_count(&record.owner, last)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::errors::assert_error;
    use crate::state::tile_store::MemoryStore;
    use anchor_lang::solana_program::program_error::ProgramError;

    /// Token balances and allowances keyed by (mint, holder).
    #[derive(Default)]
    struct TokenBook {
        balances: BTreeMap<(Pubkey, Pubkey), u64>,
        allowances: BTreeMap<(Pubkey, Pubkey), u64>,
        transfers: usize,
    }

    impl TokenBook {
        fn fund(&mut self, mint: Pubkey, wallet: Pubkey, amount: u64, allowance: u64) {
            self.balances.insert((mint, wallet), amount);
            self.allowances.insert((mint, wallet), allowance);
        }

        fn balance(&self, mint: Pubkey, holder: Pubkey) -> u64 {
            self.balances.get(&(mint, holder)).copied().unwrap_or(0)
        }
    }

    impl RewardTransfer for TokenBook {
        fn transfer_reward(
            &mut self,
            protocol: &MetadataProtocol,
            recipient: &Pubkey,
            amount: u64,
        ) -> Result<()> {
            let source = (protocol.reward_token, protocol.reward_wallet);
            let allowance = self.allowances.get(&source).copied().unwrap_or(0);
            let balance = self.balance(source.0, source.1);
            if allowance < amount || balance < amount {
                return Err(ProgramError::InsufficientFunds.into());
            }
            self.allowances.insert(source, allowance - amount);
            self.balances.insert(source, balance - amount);
            *self
                .balances
                .entry((protocol.reward_token, *recipient))
                .or_default() += amount;
            self.transfers += 1;
            Ok(())
        }
    }

    fn tiles(range: std::ops::Range<u64>) -> Vec<u64> {
        range
            .map(|path| Quadkey::new(path, 16).unwrap().key())
            .collect()
    }

    fn tile(s: &str) -> u64 {
        s.parse::<Quadkey>().unwrap().key()
    }

    fn ledger_with_minter() -> (TileLedger, MemoryStore, Pubkey) {
        let authority = Pubkey::new_unique();
        let minter = Pubkey::new_unique();
        let mut ledger = TileLedger::default();
        ledger.initialize(authority, 255);
        ledger.set_approved_minter(&authority, minter, true).unwrap();
        (ledger, MemoryStore::default(), minter)
    }

    /// Every live slot points at a record that points back at it.
    fn check_index(ledger: &TileLedger, store: &MemoryStore) {
        for (key, record) in &store.tiles {
            assert_eq!(record.key, *key);
            assert!(record.index < store.owner_count(&record.owner).unwrap());
            assert_eq!(
                store.token_of_owner_by_index(&record.owner, record.index).unwrap(),
                *key
            );
        }
        let counted: u64 = store.counts.values().sum();
        assert_eq!(counted, store.tiles.len() as u64);
        assert_eq!(counted, ledger.total_supply);
    }

    #[test]
    fn test_mint_and_enumerate() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        let keys = tiles(0..3);

        let events = ledger.mint(&mut store, &minter, owner, &keys).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], TileTransferred { from: None, to: owner, key: keys[0] });

        assert_eq!(ledger.total_supply, 3);
        assert_eq!(store.balance_of(&owner).unwrap(), 3);
        assert_eq!(store.owner_of(keys[1]).unwrap(), owner);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(store.token_of_owner_by_index(&owner, i as u64).unwrap(), *key);
        }
        assert_error(
            store.token_of_owner_by_index(&owner, 3),
            QuadlandError::IndexOutOfBounds,
        );
        assert_error(store.owner_of(tiles(3..4)[0]), QuadlandError::TileNotFound);
        check_index(&ledger, &store);
    }

    #[test]
    fn test_mint_authorization() {
        let authority = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut ledger = TileLedger::default();
        let mut store = MemoryStore::default();
        ledger.initialize(authority, 255);

        assert_error(
            ledger.mint(&mut store, &authority, owner, &tiles(0..1)),
            QuadlandError::Unauthorized,
        );
        assert_error(
            ledger.mint(&mut store, &stranger, owner, &tiles(0..1)),
            QuadlandError::Unauthorized,
        );

        ledger.update_config(&authority, Some(true), None).unwrap();
        ledger.mint(&mut store, &authority, owner, &tiles(0..1)).unwrap();
        assert_error(
            ledger.mint(&mut store, &stranger, owner, &tiles(1..2)),
            QuadlandError::Unauthorized,
        );

        assert_error(
            ledger.set_approved_minter(&stranger, stranger, true),
            QuadlandError::Unauthorized,
        );
        ledger.set_approved_minter(&authority, stranger, true).unwrap();
        ledger.set_approved_minter(&authority, stranger, true).unwrap();
        assert_eq!(ledger.approved_minters.len(), 1);
        ledger.mint(&mut store, &stranger, owner, &tiles(1..2)).unwrap();

        ledger.set_approved_minter(&authority, stranger, false).unwrap();
        assert_error(
            ledger.mint(&mut store, &stranger, owner, &tiles(2..3)),
            QuadlandError::Unauthorized,
        );
        assert_eq!(ledger.total_supply, 2);
    }

    #[test]
    fn test_minter_list_is_bounded() {
        let (mut ledger, _, _) = ledger_with_minter();
        let authority = ledger.authority;
        for _ in 1..MAX_APPROVED_MINTERS {
            ledger
                .set_approved_minter(&authority, Pubkey::new_unique(), true)
                .unwrap();
        }
        assert_error(
            ledger.set_approved_minter(&authority, Pubkey::new_unique(), true),
            QuadlandError::TooManyMinters,
        );

        let listed = ledger.approved_minters[0];
        ledger.set_approved_minter(&authority, listed, true).unwrap();
        ledger.set_approved_minter(&authority, listed, false).unwrap();
        ledger
            .set_approved_minter(&authority, Pubkey::new_unique(), true)
            .unwrap();
        assert_eq!(ledger.approved_minters.len(), MAX_APPROVED_MINTERS);
    }

    #[test]
    fn test_update_config() {
        let (mut ledger, _, minter) = ledger_with_minter();
        let authority = ledger.authority;
        let successor = Pubkey::new_unique();

        assert_error(
            ledger.update_config(&minter, Some(true), None),
            QuadlandError::Unauthorized,
        );
        ledger.update_config(&authority, None, Some(successor)).unwrap();
        assert_eq!(ledger.authority, successor);
        assert_error(
            ledger.update_config(&authority, Some(true), None),
            QuadlandError::Unauthorized,
        );
    }

    #[test]
    fn test_failed_mint_changes_nothing() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        let existing = tiles(0..2);
        ledger.mint(&mut store, &minter, first, &existing).unwrap();

        let mut with_owned = tiles(10..14);
        with_owned.push(existing[1]);
        assert_error(
            ledger.mint(&mut store, &minter, second, &with_owned),
            QuadlandError::TileAlreadyOwned,
        );

        let mut with_duplicate = tiles(10..14);
        with_duplicate.push(with_duplicate[2]);
        assert_error(
            ledger.mint(&mut store, &minter, second, &with_duplicate),
            QuadlandError::DuplicateKey,
        );

        let mut with_malformed = tiles(10..14);
        with_malformed.push(0);
        assert_error(
            ledger.mint(&mut store, &minter, second, &with_malformed),
            QuadlandError::MalformedKey,
        );
        assert_error(
            ledger.mint(&mut store, &minter, second, &[]),
            QuadlandError::EmptyBatch,
        );

        assert_eq!(store.balance_of(&second).unwrap(), 0);
        assert_eq!(store.balance_of(&first).unwrap(), 2);
        assert_eq!(ledger.total_supply, 2);
        assert_eq!(store.owner_of(existing[1]).unwrap(), first);
        assert_error(store.owner_of(tiles(10..11)[0]), QuadlandError::TileNotFound);
        check_index(&ledger, &store);
    }

    #[test]
    fn test_transfer_updates_balances() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner0 = Pubkey::new_unique();
        let owner1 = Pubkey::new_unique();
        let tile1 = tile("0231010202322300");
        let tile2 = tile("0331010202322300");
        ledger.mint(&mut store, &minter, owner0, &[tile1]).unwrap();
        ledger.mint(&mut store, &minter, owner1, &[tile2]).unwrap();

        let events = ledger
            .transfer_many(&mut store, &owner0, owner0, owner1, &[tile1])
            .unwrap();
        assert_eq!(
            events,
            vec![TileTransferred { from: Some(owner0), to: owner1, key: tile1 }]
        );
        assert_eq!(store.balance_of(&owner0).unwrap(), 0);
        assert_eq!(store.balance_of(&owner1).unwrap(), 2);
        assert_eq!(store.owner_of(tile1).unwrap(), owner1);
        assert_error(
            store.token_of_owner_by_index(&owner0, 0),
            QuadlandError::IndexOutOfBounds,
        );
        check_index(&ledger, &store);
    }

    #[test]
    fn test_transfer_rejections_leave_owners_alone() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let operator = Pubkey::new_unique();
        let alice_tiles = tiles(0..4);
        let bob_tiles = tiles(4..6);
        ledger.mint(&mut store, &minter, alice, &alice_tiles).unwrap();
        ledger.mint(&mut store, &minter, bob, &bob_tiles).unwrap();

        // operator approved for only part of the batch
        ledger
            .approve_many(&mut store, &alice, operator, &alice_tiles[..2])
            .unwrap();
        assert_error(
            ledger.transfer_many(&mut store, &operator, alice, operator, &alice_tiles),
            QuadlandError::Unauthorized,
        );

        // one key in the batch belongs to someone else
        let mut mixed = alice_tiles[..2].to_vec();
        mixed.push(bob_tiles[0]);
        assert_error(
            ledger.transfer_many(&mut store, &alice, alice, bob, &mixed),
            QuadlandError::NotTileOwner,
        );

        let mut unminted = alice_tiles.clone();
        unminted.push(tiles(100..101)[0]);
        assert_error(
            ledger.transfer_many(&mut store, &alice, alice, bob, &unminted),
            QuadlandError::TileNotFound,
        );

        let duplicated = vec![alice_tiles[0], alice_tiles[1], alice_tiles[0]];
        assert_error(
            ledger.transfer_many(&mut store, &alice, alice, bob, &duplicated),
            QuadlandError::DuplicateKey,
        );
        assert_error(
            ledger.transfer_many(&mut store, &alice, alice, bob, &[]),
            QuadlandError::EmptyBatch,
        );

        for key in &alice_tiles {
            assert_eq!(store.owner_of(*key).unwrap(), alice);
        }
        assert_eq!(store.balance_of(&alice).unwrap(), 4);
        assert_eq!(store.balance_of(&bob).unwrap(), 2);
        assert_eq!(store.approved_for(alice_tiles[0]).unwrap(), Some(operator));
        check_index(&ledger, &store);
    }

    #[test]
    fn test_approve_then_operator_transfers_batch() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner1 = Pubkey::new_unique();
        let owner2 = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let keys = tiles(0..50);
        ledger.mint(&mut store, &minter, owner1, &keys).unwrap();

        assert_error(
            ledger.approve_many(&mut store, &owner2, owner2, &keys),
            QuadlandError::Unauthorized,
        );
        ledger.approve_many(&mut store, &owner1, owner2, &keys).unwrap();
        ledger
            .transfer_many(&mut store, &owner2, owner1, recipient, &keys)
            .unwrap();

        assert_eq!(store.balance_of(&recipient).unwrap(), 50);
        assert_eq!(store.balance_of(&owner1).unwrap(), 0);
        // approvals do not follow the tile
        assert_eq!(store.approved_for(keys[0]).unwrap(), None);
        assert_error(
            ledger.transfer_many(&mut store, &owner2, recipient, owner2, &keys[..1]),
            QuadlandError::Unauthorized,
        );
        check_index(&ledger, &store);
    }

    #[test]
    fn test_approve_unminted_tile() {
        let (ledger, mut store, _) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        assert_error(
            ledger.approve_many(&mut store, &owner, owner, &tiles(0..1)),
            QuadlandError::TileNotFound,
        );
    }

    #[test]
    fn test_swap_remove_keeps_index_consistent() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let keys = tiles(0..10);
        ledger.mint(&mut store, &minter, alice, &keys).unwrap();

        ledger
            .transfer_many(&mut store, &alice, alice, bob, &[keys[0], keys[5], keys[9]])
            .unwrap();
        check_index(&ledger, &store);

        let mut remaining: Vec<u64> = (0..store.balance_of(&alice).unwrap())
            .map(|i| store.token_of_owner_by_index(&alice, i).unwrap())
            .collect();
        remaining.sort_unstable();
        let mut expected: Vec<u64> = keys
            .iter()
            .copied()
            .filter(|k| ![keys[0], keys[5], keys[9]].contains(k))
            .collect();
        expected.sort_unstable();
        assert_eq!(remaining, expected);

        ledger
            .transfer_many(&mut store, &bob, bob, alice, &[keys[5]])
            .unwrap();
        assert_eq!(store.balance_of(&alice).unwrap(), 8);
        assert_eq!(store.token_of_owner_by_index(&alice, 7).unwrap(), keys[5]);
        check_index(&ledger, &store);
    }

    #[test]
    fn test_transfer_to_self_keeps_enumeration() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let alice = Pubkey::new_unique();
        let keys = tiles(0..4);
        ledger.mint(&mut store, &minter, alice, &keys).unwrap();

        ledger
            .transfer_many(&mut store, &alice, alice, alice, &[keys[1], keys[3]])
            .unwrap();
        assert_eq!(store.balance_of(&alice).unwrap(), 4);
        check_index(&ledger, &store);
    }

    /// Each operation reads and writes a bounded number of records, however
    /// many tiles exist.
    #[test]
    fn test_thousands_of_tiles_stay_cheap_to_enumerate() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let group = 52;
        let groups = 400;

        for g in 0..groups {
            let keys = tiles(g * group..(g + 1) * group);
            ledger.mint(&mut store, &minter, owner, &keys).unwrap();
        }
        assert_eq!(store.balance_of(&owner).unwrap(), groups * group);

        for i in 100..200 {
            store.token_of_owner_by_index(&owner, i).unwrap();
        }

        let moved: Vec<u64> = (0..500)
            .map(|i| store.token_of_owner_by_index(&owner, i * 37).unwrap())
            .collect();
        ledger
            .transfer_many(&mut store, &owner, owner, other, &moved)
            .unwrap();
        assert_eq!(store.balance_of(&other).unwrap(), 500);
        assert_eq!(store.balance_of(&owner).unwrap(), groups * group - 500);
        check_index(&ledger, &store);
    }

    #[test]
    fn test_ledger_account_has_fixed_size() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let authority = ledger.authority;
        for _ in 1..MAX_APPROVED_MINTERS {
            ledger
                .set_approved_minter(&authority, Pubkey::new_unique(), true)
                .unwrap();
        }
        ledger
            .mint(&mut store, &minter, Pubkey::new_unique(), &tiles(0..520))
            .unwrap();

        let mut data = Vec::new();
        ledger.try_serialize(&mut data).unwrap();
        assert!(data.len() <= 8 + TileLedger::INIT_SPACE);
        assert_eq!(TileRecord::INIT_SPACE, 8 + 32 + 8 + 33);
    }

    #[test]
    fn test_unique_group_id() {
        let id = TileLedger::unique_group_id(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(id, TileLedger::unique_group_id(&[1, 2, 3, 4, 5]).unwrap());
        assert_ne!(id, TileLedger::unique_group_id(&[1, 2, 3, 4, 6]).unwrap());

        assert_error(TileLedger::unique_group_id(&[3, 2]), QuadlandError::UnorderedGroup);
        assert_error(
            TileLedger::unique_group_id(&[1, 2, 3, 4, 4, 5]),
            QuadlandError::UnorderedGroup,
        );
        assert_error(TileLedger::unique_group_id(&[]), QuadlandError::EmptyBatch);
    }

    fn protocol(wallet: Pubkey, owner: Pubkey, mint: Pubkey) -> MetadataProtocol {
        MetadataProtocol {
            create_reward: 2000,
            update_reward: 1000,
            reward_wallet: wallet,
            protocol_owner: owner,
            reward_token: mint,
        }
    }

    #[test]
    fn test_protocol_registry() {
        let (ledger, mut store, _) = ledger_with_minter();
        let wallet = Pubkey::new_unique();
        let protocol_owner = Pubkey::new_unique();
        let successor = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        ledger
            .create_metadata_protocol(&mut store, 1, &protocol(wallet, protocol_owner, mint))
            .unwrap();
        assert_eq!(
            store.protocol(1).unwrap(),
            Some(protocol(wallet, protocol_owner, mint))
        );
        assert_error(
            ledger.create_metadata_protocol(&mut store, 1, &protocol(wallet, wallet, mint)),
            QuadlandError::ProtocolExists,
        );

        let replacement = MetadataProtocol {
            create_reward: 3000,
            update_reward: 2000,
            reward_wallet: ledger.authority,
            protocol_owner: successor,
            reward_token: Pubkey::new_unique(),
        };
        assert_error(
            ledger.update_reward(&mut store, &wallet, 1, &replacement),
            QuadlandError::Unauthorized,
        );
        assert_error(
            ledger.update_reward(&mut store, &protocol_owner, 2, &replacement),
            QuadlandError::UnknownProtocol,
        );
        ledger
            .update_reward(&mut store, &protocol_owner, 1, &replacement)
            .unwrap();
        assert_eq!(store.protocol(1).unwrap(), Some(replacement));
    }

    #[test]
    fn test_metadata_rewards_create_then_update() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let tile1 = tile("0231010202322300");
        let tile2 = tile("0331010202322300");
        ledger.mint(&mut store, &minter, owner, &[tile1, tile2]).unwrap();
        ledger
            .create_metadata_protocol(&mut store, 1, &protocol(wallet, Pubkey::new_unique(), mint))
            .unwrap();
        let mut book = TokenBook::default();
        book.fund(mint, wallet, 1_000_000, 4000);

        assert_eq!(store.token_metadata(1, tile1).unwrap(), "");
        let event = ledger
            .update_token_metadata(&mut store, &owner, 1, tile1, "HELLO", &mut book)
            .unwrap();
        assert_eq!(
            event,
            MetadataUpdated {
                protocol_id: 1,
                key: tile1,
                owner,
                text: "HELLO".to_string(),
            }
        );
        assert_eq!(book.balance(mint, owner), 2000);

        ledger
            .update_token_metadata(&mut store, &owner, 1, tile1, "GOODBYE", &mut book)
            .unwrap();
        assert_eq!(book.balance(mint, owner), 3000);
        assert_eq!(store.token_metadata(1, tile1).unwrap(), "GOODBYE");
        assert_eq!(store.token_metadata(1, tile2).unwrap(), "");
    }

    #[test]
    fn test_metadata_not_written_when_reward_fails() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let key = tile("0231010202322300");
        ledger.mint(&mut store, &minter, owner, &[key]).unwrap();
        ledger
            .create_metadata_protocol(&mut store, 1, &protocol(wallet, Pubkey::new_unique(), mint))
            .unwrap();

        let mut book = TokenBook::default();
        book.fund(mint, wallet, 1_000_000, 1999);
        assert!(ledger
            .update_token_metadata(&mut store, &owner, 1, key, "HELLO", &mut book)
            .is_err());
        assert_eq!(store.token_metadata(1, key).unwrap(), "");
        assert_eq!(book.balance(mint, owner), 0);
    }

    #[test]
    fn test_metadata_requires_ownership() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let key = tile("0231010202322300");
        ledger.mint(&mut store, &minter, owner, &[key]).unwrap();
        let mut book = TokenBook::default();

        assert_error(
            ledger.update_token_metadata(&mut store, &stranger, 1, key, "mine", &mut book),
            QuadlandError::Unauthorized,
        );
        assert_error(
            ledger.update_token_metadata(&mut store, &owner, 1, tiles(0..1)[0], "x", &mut book),
            QuadlandError::TileNotFound,
        );
        assert_error(
            ledger.update_token_metadata(&mut store, &owner, 1, key, "", &mut book),
            QuadlandError::EmptyMetadata,
        );
        let long = "x".repeat(MAX_METADATA_LEN + 1);
        assert_error(
            ledger.update_token_metadata(&mut store, &owner, 1, key, &long, &mut book),
            QuadlandError::MetadataTooLong,
        );
        ledger
            .update_token_metadata(&mut store, &owner, 1, key, &long[1..], &mut book)
            .unwrap();
    }

    #[test]
    fn test_unregistered_protocol_stores_without_reward() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        let keys = tiles(0..2);
        ledger.mint(&mut store, &minter, owner, &keys).unwrap();
        let mut book = TokenBook::default();

        ledger
            .update_token_metadata(&mut store, &owner, 7, keys[1], "wat", &mut book)
            .unwrap();
        assert_eq!(store.token_metadata(7, keys[1]).unwrap(), "wat");

        let events = ledger
            .update_many_token_metadata(&mut store, &owner, 7, &keys, "blah", &mut book)
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(store.token_metadata(7, keys[0]).unwrap(), "blah");
        assert_eq!(store.token_metadata(7, keys[1]).unwrap(), "blah");
        assert_eq!(book.transfers, 0);
    }

    #[test]
    fn test_update_many_pays_summed_reward_once() {
        let (mut ledger, mut store, minter) = ledger_with_minter();
        let owner = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let keys = tiles(0..3);
        ledger.mint(&mut store, &minter, owner, &keys).unwrap();
        ledger
            .create_metadata_protocol(&mut store, 1, &protocol(wallet, Pubkey::new_unique(), mint))
            .unwrap();
        let mut book = TokenBook::default();
        book.fund(mint, wallet, 1_000_000, 1_000_000);

        ledger
            .update_token_metadata(&mut store, &owner, 1, keys[0], "first", &mut book)
            .unwrap();
        ledger
            .update_many_token_metadata(&mut store, &owner, 1, &keys, "second", &mut book)
            .unwrap();

        // 2000 for keys[0], then 1000 + 2000 + 2000
        assert_eq!(book.balance(mint, owner), 7000);
        assert_eq!(book.transfers, 2);
        assert_error(
            ledger.update_many_token_metadata(
                &mut store,
                &owner,
                1,
                &[keys[0], keys[0]],
                "dup",
                &mut book,
            ),
            QuadlandError::DuplicateKey,
        );
    }
}
