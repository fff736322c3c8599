use std::fmt;
use std::str::FromStr;

use anchor_lang::prelude::*;

use crate::errors::QuadlandError;

/// Deepest zoom a `u64` tile key can carry: 31 digits of 2 bits plus the terminator.
pub const MAX_KEY_ZOOM: u8 = 31;

/// Widest zoom mask that fits in a `u64`.
pub const MAX_MASK_ZOOM: u8 = 32;

/// A decoded quadtree path.
///
/// `path` holds the digits right-aligned, most significant digit first, so
/// `"0231"` is `0b00_10_11_01`. On the wire a tile key is a `u64` with the
/// digits left-aligned from bit 63, followed by a single terminator bit and
/// zero padding. Only `from_key`/`key` touch that layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quadkey {
    path: u64,
    zoom: u8,
}

impl Quadkey {
    pub fn root() -> Self {
        Quadkey { path: 0, zoom: 0 }
    }

    pub fn new(path: u64, zoom: u8) -> Result<Self> {
        require!(zoom <= MAX_KEY_ZOOM, QuadlandError::ZoomOutOfRange);
        require!(path >> (2 * zoom as u32) == 0, QuadlandError::MalformedKey);
        Ok(Quadkey { path, zoom })
    }

    /// Decode a tile key. The terminator is the lowest set bit and must sit on
    /// an even position counted from the most significant bit.
    pub fn from_key(key: u64) -> Result<Self> {
        require!(key != 0, QuadlandError::MalformedKey);
        let from_msb = 63 - key.trailing_zeros();
        require!(from_msb % 2 == 0, QuadlandError::MalformedKey);

        let zoom = (from_msb / 2) as u8;
        let path = if zoom == 0 { 0 } else { key >> (64 - 2 * zoom as u32) };
        Ok(Quadkey { path, zoom })
    }

    pub fn key(&self) -> u64 {
        let shift = 2 * self.zoom as u32;
        let digits = if self.zoom == 0 { 0 } else { self.path << (64 - shift) };
        digits | (1u64 << (63 - shift))
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn path(&self) -> u64 {
        self.path
    }

    /// Digit at depth `level` (0 = the root's child).
    pub fn digit(&self, level: u8) -> Option<u8> {
        if level >= self.zoom {
            return None;
        }
        let shift = 2 * (self.zoom - 1 - level) as u32;
        Some(((self.path >> shift) & 0b11) as u8)
    }

    pub fn child(&self, digit: u8) -> Result<Self> {
        require!(digit < 4, QuadlandError::MalformedKey);
        require!(self.zoom < MAX_KEY_ZOOM, QuadlandError::ZoomOutOfRange);
        Ok(Quadkey {
            path: (self.path << 2) | digit as u64,
            zoom: self.zoom + 1,
        })
    }

    pub fn zoom_out(&self, levels: u8) -> Result<Self> {
        require!(levels <= self.zoom, QuadlandError::ZoomOutOfRange);
        let path = if levels == 0 {
            self.path
        } else {
            self.path >> (2 * levels as u32)
        };
        Ok(Quadkey {
            path,
            zoom: self.zoom - levels,
        })
    }

    /// Reflexive: a key is its own ancestor.
    pub fn is_ancestor_of(&self, other: &Quadkey) -> bool {
        if self.zoom > other.zoom {
            return false;
        }
        let depth = other.zoom - self.zoom;
        other.path >> (2 * depth as u32) == self.path
    }
}

impl fmt::Display for Quadkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in 0..self.zoom {
            let digit = self.digit(level).unwrap_or_default();
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

impl FromStr for Quadkey {
    type Err = anchor_lang::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars().try_fold(Quadkey::root(), |key, c| {
            let digit = c.to_digit(4).ok_or(QuadlandError::MalformedKey)?;
            key.child(digit as u8)
        })
    }
}

/// Mask with the top `2 * zoom` bits set, isolating the path of a key at `zoom`.
pub fn zoom_mask(zoom: u8) -> Result<u64> {
    require!(
        (1..=MAX_MASK_ZOOM).contains(&zoom),
        QuadlandError::ZoomOutOfRange
    );
    Ok(u64::MAX << (64 - 2 * zoom as u32))
}

pub fn zoom_of(key: u64) -> Result<u8> {
    Ok(Quadkey::from_key(key)?.zoom())
}

pub fn is_zoom(key: u64, zoom: u8) -> Result<bool> {
    Ok(zoom_of(key)? == zoom)
}

pub fn is_ancestor(parent: u64, child: u64) -> Result<bool> {
    let parent = Quadkey::from_key(parent)?;
    let child = Quadkey::from_key(child)?;
    Ok(parent.is_ancestor_of(&child))
}

pub fn zoom_out(key: u64, levels: u8) -> Result<u64> {
    Ok(Quadkey::from_key(key)?.zoom_out(levels)?.key())
}

/// Width of a `PackedBits` container.
pub const PACKED_BITS: u32 = 256;

/// 256-bit container for `pack`/`unpack`, little-endian limbs: bit 0 is the
/// lowest bit of `limbs[0]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PackedBits {
    pub limbs: [u64; 4],
}

impl PackedBits {
    fn insert(&mut self, offset: u32, width: u32, value: u64) {
        let limb = (offset / 64) as usize;
        let shift = offset % 64;
        self.limbs[limb] |= value << shift;
        if shift + width > 64 {
            self.limbs[limb + 1] |= value >> (64 - shift);
        }
    }

    fn extract(&self, offset: u32, width: u32) -> u64 {
        let limb = (offset / 64) as usize;
        let shift = offset % 64;
        let mut value = self.limbs[limb] >> shift;
        if shift + width > 64 {
            value |= self.limbs[limb + 1] << (64 - shift);
        }
        value & width_mask(width)
    }
}

fn width_mask(width: u32) -> u64 {
    if width == 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Pack `values` back to back starting at bit 0, each taking its matching width.
pub fn pack(values: &[u64], widths: &[u32]) -> Result<PackedBits> {
    require!(
        values.len() == widths.len(),
        QuadlandError::InvalidBitLayout
    );

    let mut packed = PackedBits::default();
    let mut offset = 0u32;
    for (&value, &width) in values.iter().zip(widths) {
        require!(
            (1..=64).contains(&width),
            QuadlandError::InvalidBitLayout
        );
        require!(
            offset + width <= PACKED_BITS,
            QuadlandError::InvalidBitLayout
        );
        require!(
            value & !width_mask(width) == 0,
            QuadlandError::InvalidBitLayout
        );
        packed.insert(offset, width, value);
        offset += width;
    }
    Ok(packed)
}

pub fn unpack(packed: &PackedBits, width: u32, offset: u32) -> Result<u64> {
    require!(
        (1..=64).contains(&width),
        QuadlandError::InvalidBitLayout
    );
    require!(
        offset.checked_add(width).map_or(false, |end| end <= PACKED_BITS),
        QuadlandError::InvalidBitLayout
    );
    Ok(packed.extract(offset, width))
}
