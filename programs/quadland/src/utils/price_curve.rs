use anchor_lang::prelude::*;

use crate::errors::QuadlandError;
use crate::utils::quadkey::zoom_of;

/// Linear Dutch auction from `start_price` at `start_time` down to `end_price`
/// at `end_time`. Prices are in lamports, times in unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct PriceCurve {
    pub start_time: i64,
    pub end_time: i64,
    pub start_price: u64,
    pub end_price: u64,
}

impl PriceCurve {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.start_time < self.end_time,
            QuadlandError::InvalidPriceCurve
        );
        require!(
            self.start_price >= self.end_price,
            QuadlandError::InvalidPriceCurve
        );
        Ok(())
    }

    pub fn unit_price(&self, now: i64) -> Result<u64> {
        unit_price(
            now,
            self.start_time,
            self.end_time,
            self.start_price,
            self.end_price,
        )
    }
}

/// Price of one leaf tile at `now`.
///
/// Between the bounds the exact linear price is rounded down, so a buyer never
/// pays more than the continuous-time price.
pub fn unit_price(
    now: i64,
    start_time: i64,
    end_time: i64,
    start_price: u64,
    end_price: u64,
) -> Result<u64> {
    require!(start_time < end_time, QuadlandError::InvalidPriceCurve);
    require!(start_price >= end_price, QuadlandError::InvalidPriceCurve);

    if now <= start_time {
        return Ok(start_price);
    }
    if now >= end_time {
        return Ok(end_price);
    }

    let remaining = (end_time - now) as u128;
    let duration = (end_time - start_time) as u128;
    let spread = (start_price - end_price) as u128;

    // spread < 2^64 and remaining < 2^64, the product fits in u128
    let above_floor = spread * remaining / duration;
    let price = (end_price as u128)
        .checked_add(above_floor)
        .ok_or(QuadlandError::Overflow)?;
    u64::try_from(price).map_err(|_| error!(QuadlandError::Overflow))
}

/// Number of leaf tiles a key at `zoom` covers when `max_zoom` is the leaf level.
pub fn area(zoom: u8, max_zoom: u8) -> Result<u64> {
    require!(zoom <= max_zoom, QuadlandError::ZoomTooDeep);
    let exponent = 2 * (max_zoom - zoom) as u32;
    1u64.checked_shl(exponent)
        .ok_or_else(|| error!(QuadlandError::Overflow))
}

/// Area-weighted price of every key in the batch.
pub fn total_price(keys: &[u64], now: i64, curve: &PriceCurve, max_zoom: u8) -> Result<u64> {
    require!(!keys.is_empty(), QuadlandError::EmptyBatch);
    let unit = curve.unit_price(now)?;

    keys.iter().try_fold(0u64, |total, &key| {
        let tiles = area(zoom_of(key)?, max_zoom)?;
        let cost = unit.checked_mul(tiles).ok_or(QuadlandError::Overflow)?;
        Ok(total.checked_add(cost).ok_or(QuadlandError::Overflow)?)
    })
}
