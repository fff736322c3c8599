use anchor_lang::prelude::*;

use crate::errors::QuadlandError;
use crate::events::{ReservationMade, TileTransferred, TilesPurchased};
use crate::state::{ReservationStore, TileLedger, TileStore};
use crate::utils::{total_price, zoom_of, PriceCurve, Quadkey, MAX_KEY_ZOOM};

/// Rule that flips a sale into its terminal state.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationPolicy {
    /// Ends at `end_time` or once `value_cap` lamports have been raised.
    TimeOrValueCap { value_cap: u64 },
    /// Ends only once `unit_cap` tiles are sold; `end_time` just floors the price.
    UnitCapOnly { unit_cap: u64 },
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresaleWindow {
    pub reservation_start: i64,
    pub presale_start: i64,
    pub presale_end: i64,
    /// Maximum number of reservations
    pub capacity: u32,
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Debug, PartialEq, Eq)]
pub struct SaleConfig {
    pub presale: Option<PresaleWindow>,
    /// Public window and auction prices
    pub curve: PriceCurve,
    /// Leaf zoom; coarser tiles are priced by the leaves they cover
    pub max_zoom: u8,
    /// When set, every purchased tile must lie inside this key
    pub region: Option<u64>,
    pub policy: TerminationPolicy,
    /// Receives every payment
    pub wallet: Pubkey,
}

impl SaleConfig {
    pub fn validate(&self) -> Result<()> {
        self.curve.validate()?;
        require!(
            (1..=MAX_KEY_ZOOM).contains(&self.max_zoom),
            QuadlandError::InvalidSaleConfig
        );

        if let Some(presale) = &self.presale {
            require!(
                presale.reservation_start < presale.presale_start
                    && presale.presale_start < presale.presale_end
                    && presale.presale_end <= self.curve.start_time,
                QuadlandError::InvalidSaleConfig
            );
            require!(presale.capacity > 0, QuadlandError::InvalidSaleConfig);
        }

        let cap = match self.policy {
            TerminationPolicy::TimeOrValueCap { value_cap } => value_cap,
            TerminationPolicy::UnitCapOnly { unit_cap } => unit_cap,
        };
        require!(cap > 0, QuadlandError::InvalidSaleConfig);

        if let Some(region) = self.region {
            require!(
                zoom_of(region)? <= self.max_zoom,
                QuadlandError::InvalidSaleConfig
            );
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalePhase {
    /// No window is open
    Created,
    Reservation,
    Presale,
    Public,
    Ended,
}

/// Lamports the handler must move for one accepted purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub wallet: Pubkey,
    pub lamports: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purchase {
    pub settlement: Settlement,
    pub event: TilesPurchased,
    pub transfers: Vec<TileTransferred>,
}

/// Reservations are `Reservation` PDAs seeded by this account; only their
/// number is kept here.
#[account]
#[derive(InitSpace, Debug)]
pub struct Sale {
    pub authority: Pubkey,
    pub ledger: Pubkey,
    /// Address of the sale account; the identity approved as a ledger minter
    pub minter: Pubkey,
    pub config: SaleConfig,
    pub value_raised: u64,
    pub units_sold: u64,
    pub reserved_count: u32,
    pub ended: bool,
}

impl Sale {
    pub fn new(authority: Pubkey, ledger: Pubkey, minter: Pubkey, config: SaleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Sale {
            authority,
            ledger,
            minter,
            config,
            value_raised: 0,
            units_sold: 0,
            reserved_count: 0,
            ended: false,
        })
    }

    /// Evaluated on every call, never cached beyond the `ended` latch.
    pub fn has_ended(&self, now: i64) -> bool {
        if self.ended {
            return true;
        }
        match self.config.policy {
            TerminationPolicy::TimeOrValueCap { value_cap } => {
                now >= self.config.curve.end_time || self.value_raised >= value_cap
            }
            TerminationPolicy::UnitCapOnly { unit_cap } => self.units_sold >= unit_cap,
        }
    }

    pub fn phase(&self, now: i64) -> SalePhase {
        if self.has_ended(now) {
            return SalePhase::Ended;
        }
        if now >= self.config.curve.start_time {
            return SalePhase::Public;
        }
        match &self.config.presale {
            Some(p) if now >= p.presale_start && now < p.presale_end => SalePhase::Presale,
            Some(p) if now >= p.reservation_start && now < p.presale_start => {
                SalePhase::Reservation
            }
            _ => SalePhase::Created,
        }
    }

    /// Current price of `keys`.
    pub fn price(&self, now: i64, keys: &[u64]) -> Result<u64> {
        total_price(keys, now, &self.config.curve, self.config.max_zoom)
    }

    pub fn reserve_spot<S: ReservationStore>(
        &mut self,
        store: &mut S,
        now: i64,
        caller: Pubkey,
    ) -> Result<ReservationMade> {
        require!(!self.has_ended(now), QuadlandError::SaleEnded);
        require!(
            self.phase(now) == SalePhase::Reservation,
            QuadlandError::OutsideWindow
        );
        let capacity = self
            .config
            .presale
            .map(|p| p.capacity)
            .ok_or(QuadlandError::OutsideWindow)?;
        require!(
            !store.is_reserved(&self.minter, &caller)?,
            QuadlandError::AlreadyReserved
        );
        require!(self.reserved_count < capacity, QuadlandError::PresaleFull);

        store.put_reservation(&self.minter, &caller)?;
        self.reserved_count += 1;
        Ok(ReservationMade {
            sale: self.minter,
            caller,
            reserved_count: self.reserved_count,
        })
    }

    /// Price, mint and count one purchase. The whole `value` is settled to
    /// `config.wallet`; nothing here changes unless the mint lands.
    #[allow(clippy::too_many_arguments)]
    pub fn purchase<S: TileStore + ReservationStore>(
        &mut self,
        ledger: &mut TileLedger,
        store: &mut S,
        now: i64,
        caller: Pubkey,
        beneficiary: Pubkey,
        keys: &[u64],
        value: u64,
    ) -> Result<Purchase> {
        require!(!self.has_ended(now), QuadlandError::SaleEnded);
        match self.phase(now) {
            SalePhase::Public => {}
            SalePhase::Presale => require!(
                store.is_reserved(&self.minter, &caller)?,
                QuadlandError::NotReserved
            ),
            _ => return err!(QuadlandError::OutsideWindow),
        }
        require!(!keys.is_empty(), QuadlandError::EmptyBatch);

        if let Some(region) = self.config.region {
            let region = Quadkey::from_key(region)?;
            for &key in keys {
                require!(
                    region.is_ancestor_of(&Quadkey::from_key(key)?),
                    QuadlandError::OutsideRegion
                );
            }
        }

        let price = self.price(now, keys)?;
        require!(value >= price, QuadlandError::InsufficientPayment);

        let units_sold = self
            .units_sold
            .checked_add(keys.len() as u64)
            .ok_or(QuadlandError::Overflow)?;
        if let TerminationPolicy::UnitCapOnly { unit_cap } = self.config.policy {
            require!(units_sold <= unit_cap, QuadlandError::SupplyExhausted);
        }
        let value_raised = self
            .value_raised
            .checked_add(value)
            .ok_or(QuadlandError::Overflow)?;

        let transfers = ledger.mint(store, &self.minter, beneficiary, keys)?;

        self.units_sold = units_sold;
        self.value_raised = value_raised;
        if self.has_ended(now) {
            self.ended = true;
        }

        Ok(Purchase {
            settlement: Settlement {
                wallet: self.config.wallet,
                lamports: value,
            },
            event: TilesPurchased {
                sale: self.minter,
                caller,
                beneficiary,
                value,
                key_count: keys.len() as u32,
            },
            transfers,
        })
    }
}
