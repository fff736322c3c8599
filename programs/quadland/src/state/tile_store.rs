use anchor_lang::prelude::*;
use anchor_lang::system_program::{create_account, CreateAccount};

use crate::errors::QuadlandError;
use crate::state::{
    MetadataProtocol, MetadataProtocolAccount, OwnerIndex, OwnerSlot, Reservation, TileMetadata,
    TileRecord,
};

/// Per-entity storage behind the ledger. Every call touches a single record,
/// so ledger operations cost the same after ten mints or ten thousand.
pub trait TileStore {
    fn tile(&self, key: u64) -> Result<Option<TileRecord>>;
    fn put_tile(&mut self, record: &TileRecord) -> Result<()>;

    fn owner_count(&self, owner: &Pubkey) -> Result<u64>;
    fn put_owner_count(&mut self, owner: &Pubkey, count: u64) -> Result<()>;

    fn owner_slot(&self, owner: &Pubkey, index: u64) -> Result<Option<u64>>;
    fn put_owner_slot(&mut self, owner: &Pubkey, index: u64, key: u64) -> Result<()>;

    fn protocol(&self, protocol_id: u64) -> Result<Option<MetadataProtocol>>;
    fn put_protocol(&mut self, protocol_id: u64, protocol: &MetadataProtocol) -> Result<()>;

    fn metadata(&self, protocol_id: u64, key: u64) -> Result<Option<String>>;
    fn put_metadata(&mut self, protocol_id: u64, key: u64, text: &str) -> Result<()>;

    fn owner_of(&self, key: u64) -> Result<Pubkey> {
        self.tile(key)?
            .map(|record| record.owner)
            .ok_or_else(|| error!(QuadlandError::TileNotFound))
    }

    fn approved_for(&self, key: u64) -> Result<Option<Pubkey>> {
        Ok(self.tile(key)?.and_then(|record| record.approved))
    }

    fn balance_of(&self, owner: &Pubkey) -> Result<u64> {
        self.owner_count(owner)
    }

    fn token_of_owner_by_index(&self, owner: &Pubkey, index: u64) -> Result<u64> {
        require!(
            index < self.owner_count(owner)?,
            QuadlandError::IndexOutOfBounds
        );
        self.owner_slot(owner, index)?
            .ok_or_else(|| error!(QuadlandError::IndexOutOfBounds))
    }

    /// Empty string when nothing has been written.
    fn token_metadata(&self, protocol_id: u64, key: u64) -> Result<String> {
        Ok(self.metadata(protocol_id, key)?.unwrap_or_default())
    }
}

pub trait ReservationStore {
    fn is_reserved(&self, sale: &Pubkey, who: &Pubkey) -> Result<bool>;
    fn put_reservation(&mut self, sale: &Pubkey, who: &Pubkey) -> Result<()>;
}

/// `TileStore` over program PDAs passed as remaining accounts.
///
/// Each record is located by deriving its address, so accounts may be passed
/// in any order. Missing records are created on first write, paid by `payer`.
pub struct PdaStore<'a, 'info> {
    ledger: Pubkey,
    payer: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
    accounts: &'a [AccountInfo<'info>],
}

impl<'a, 'info> PdaStore<'a, 'info> {
    pub fn new(
        ledger: Pubkey,
        payer: AccountInfo<'info>,
        system_program: AccountInfo<'info>,
        accounts: &'a [AccountInfo<'info>],
    ) -> Self {
        PdaStore {
            ledger,
            payer,
            system_program,
            accounts,
        }
    }

    fn find(&self, seeds: &[&[u8]]) -> Result<(&'a AccountInfo<'info>, u8)> {
        let (address, bump) = Pubkey::find_program_address(seeds, &crate::ID);
        let info = self
            .accounts
            .iter()
            .find(|info| info.key == &address)
            .ok_or_else(|| error!(QuadlandError::MissingTileAccount))?;
        Ok((info, bump))
    }

    fn load<T: AccountDeserialize>(&self, seeds: &[&[u8]]) -> Result<Option<T>> {
        let (info, _) = self.find(seeds)?;
        if info.data_is_empty() {
            return Ok(None);
        }
        require_keys_eq!(*info.owner, crate::ID, QuadlandError::InvalidAccountOwner);

        let data = info.try_borrow_data()?;
        T::try_deserialize(&mut &data[..]).map(Some)
    }

    fn save<T: AccountSerialize + Space>(&self, seeds: &[&[u8]], value: &T) -> Result<()> {
        let (info, bump) = self.find(seeds)?;
        if info.data_is_empty() {
            let space = 8 + T::INIT_SPACE;
            let bump = [bump];
            let mut signer = seeds.to_vec();
            signer.push(&bump);

            create_account(
                CpiContext::new_with_signer(
                    self.system_program.clone(),
                    CreateAccount {
                        from: self.payer.clone(),
                        to: info.clone(),
                    },
                    &[signer.as_slice()],
                ),
                Rent::get()?.minimum_balance(space),
                space as u64,
                &crate::ID,
            )?;
        }
        require_keys_eq!(*info.owner, crate::ID, QuadlandError::InvalidAccountOwner);

        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        value.try_serialize(&mut writer)
    }
}

impl TileStore for PdaStore<'_, '_> {
    fn tile(&self, key: u64) -> Result<Option<TileRecord>> {
        self.load(&[TileRecord::SEED, self.ledger.as_ref(), &key.to_le_bytes()])
    }

    fn put_tile(&mut self, record: &TileRecord) -> Result<()> {
        self.save(
            &[TileRecord::SEED, self.ledger.as_ref(), &record.key.to_le_bytes()],
            record,
        )
    }

    fn owner_count(&self, owner: &Pubkey) -> Result<u64> {
        let index: Option<OwnerIndex> =
            self.load(&[OwnerIndex::SEED, self.ledger.as_ref(), owner.as_ref()])?;
        Ok(index.map_or(0, |index| index.count))
    }

    fn put_owner_count(&mut self, owner: &Pubkey, count: u64) -> Result<()> {
        self.save(
            &[OwnerIndex::SEED, self.ledger.as_ref(), owner.as_ref()],
            &OwnerIndex {
                owner: *owner,
                count,
            },
        )
    }

    fn owner_slot(&self, owner: &Pubkey, index: u64) -> Result<Option<u64>> {
        let slot: Option<OwnerSlot> = self.load(&[
            OwnerSlot::SEED,
            self.ledger.as_ref(),
            owner.as_ref(),
            &index.to_le_bytes(),
        ])?;
        Ok(slot.map(|slot| slot.key))
    }

    fn put_owner_slot(&mut self, owner: &Pubkey, index: u64, key: u64) -> Result<()> {
        self.save(
            &[
                OwnerSlot::SEED,
                self.ledger.as_ref(),
                owner.as_ref(),
                &index.to_le_bytes(),
            ],
            &OwnerSlot {
                owner: *owner,
                index,
                key,
            },
        )
    }

    fn protocol(&self, protocol_id: u64) -> Result<Option<MetadataProtocol>> {
        let account: Option<MetadataProtocolAccount> = self.load(&[
            MetadataProtocolAccount::SEED,
            self.ledger.as_ref(),
            &protocol_id.to_le_bytes(),
        ])?;
        Ok(account.map(|account| account.protocol))
    }

    fn put_protocol(&mut self, protocol_id: u64, protocol: &MetadataProtocol) -> Result<()> {
        self.save(
            &[
                MetadataProtocolAccount::SEED,
                self.ledger.as_ref(),
                &protocol_id.to_le_bytes(),
            ],
            &MetadataProtocolAccount {
                protocol_id,
                protocol: protocol.clone(),
            },
        )
    }

    fn metadata(&self, protocol_id: u64, key: u64) -> Result<Option<String>> {
        let metadata: Option<TileMetadata> = self.load(&[
            TileMetadata::SEED,
            self.ledger.as_ref(),
            &protocol_id.to_le_bytes(),
            &key.to_le_bytes(),
        ])?;
        Ok(metadata.map(|metadata| metadata.text))
    }

    fn put_metadata(&mut self, protocol_id: u64, key: u64, text: &str) -> Result<()> {
        self.save(
            &[
                TileMetadata::SEED,
                self.ledger.as_ref(),
                &protocol_id.to_le_bytes(),
                &key.to_le_bytes(),
            ],
            &TileMetadata {
                protocol_id,
                key,
                text: text.to_string(),
            },
        )
    }
}

impl ReservationStore for PdaStore<'_, '_> {
    fn is_reserved(&self, sale: &Pubkey, who: &Pubkey) -> Result<bool> {
        let reservation: Option<Reservation> =
            self.load(&[Reservation::SEED, sale.as_ref(), who.as_ref()])?;
        Ok(reservation.is_some())
    }

    fn put_reservation(&mut self, sale: &Pubkey, who: &Pubkey) -> Result<()> {
        self.save(
            &[Reservation::SEED, sale.as_ref(), who.as_ref()],
            &Reservation {
                sale: *sale,
                reserver: *who,
            },
        )
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;
