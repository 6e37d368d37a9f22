//! CHS <-> LBA disk geometry conversion
//!
//! ```text
//! LBA = MAX_HEAD * MAX_SECTOR * C + MAX_SECTOR * H + (S - 1)
//!
//! C = LBA / (MAX_SECTOR * MAX_HEAD)
//! H = (LBA / MAX_SECTOR) % MAX_HEAD
//! S = (LBA % MAX_SECTOR) + 1
//! ```
//!
//! Parameter strings are dash-delimited and positional, trailing geometry
//! bounds default to 16 heads and 63 sectors: `C-H-S[-MH[-MS]]` and
//! `L[-MH[-MS]]`.

use std::fmt;

use crate::error::GeometryError;
use crate::units::parse_uint;

pub const DEFAULT_MAX_HEAD: u64 = 16;
pub const DEFAULT_MAX_SECTOR: u64 = 63;

/// Cylinder / head / sector address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chs {
    pub cylinder: u128,
    pub head: u64,
    pub sector: u64,
}

impl Chs {
    pub fn new(cylinder: u128, head: u64, sector: u64) -> Self {
        Self {
            cylinder,
            head,
            sector,
        }
    }
}

impl fmt::Display for Chs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.cylinder, self.head, self.sector)
    }
}

/// Convert a CHS address to a logical block address
pub fn chs_to_lba(
    cylinder: u128,
    head: u64,
    sector: u64,
    max_head: u64,
    max_sector: u64,
) -> Result<u128, GeometryError> {
    if max_head == 0 {
        return Err(GeometryError::ZeroMaxHead);
    }
    if max_sector == 0 {
        return Err(GeometryError::ZeroMaxSector);
    }
    if sector == 0 {
        return Err(GeometryError::ZeroSector);
    }
    if head > max_head {
        return Err(GeometryError::HeadOutOfRange);
    }
    if sector > max_sector {
        return Err(GeometryError::SectorOutOfRange);
    }

    let max_head = u128::from(max_head);
    let max_sector = u128::from(max_sector);

    max_head
        .checked_mul(max_sector)
        .and_then(|spc| spc.checked_mul(cylinder))
        .and_then(|lba| lba.checked_add(max_sector * u128::from(head)))
        .and_then(|lba| lba.checked_add(u128::from(sector - 1)))
        .ok_or(GeometryError::Overflow)
}

/// Convert a logical block address to CHS
pub fn lba_to_chs(lba: u128, max_head: u64, max_sector: u64) -> Result<Chs, GeometryError> {
    if max_head == 0 {
        return Err(GeometryError::ZeroMaxHead);
    }
    if max_sector == 0 {
        return Err(GeometryError::ZeroMaxSector);
    }

    let mh = u128::from(max_head);
    let ms = u128::from(max_sector);

    let cylinder = lba / (ms * mh);

    let head = u64::try_from((lba / ms) % mh).map_err(|_| GeometryError::HeadOutOfRange)?;
    if head > max_head {
        return Err(GeometryError::HeadOutOfRange);
    }

    let sector = u64::try_from(lba % ms + 1).map_err(|_| GeometryError::SectorOutOfRange)?;
    if sector > max_sector {
        return Err(GeometryError::SectorOutOfRange);
    }

    Ok(Chs {
        cylinder,
        head,
        sector,
    })
}

fn split_params(params: &str, max: usize) -> Result<Vec<&str>, GeometryError> {
    if params.is_empty() {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = params.split('-').collect();
    if parts.len() > max {
        return Err(GeometryError::InvalidComponent(parts[max..].join("-")));
    }
    Ok(parts)
}

fn parse_component(text: &str) -> Result<u128, GeometryError> {
    parse_uint(text.trim()).map_err(|_| GeometryError::InvalidComponent(text.to_string()))
}

fn parse_small(text: &str) -> Result<u64, GeometryError> {
    let value = parse_component(text)?;
    u64::try_from(value).map_err(|_| GeometryError::InvalidComponent(text.to_string()))
}

/// Parsed `C-H-S[-MH[-MS]]` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChsParams {
    pub chs: Chs,
    pub max_head: u64,
    pub max_sector: u64,
}

impl ChsParams {
    pub fn parse(params: &str) -> Result<Self, GeometryError> {
        let parts = split_params(params, 5)?;
        if parts.len() < 3 {
            return Err(GeometryError::MissingChs);
        }

        let chs = Chs::new(
            parse_component(parts[0])?,
            parse_small(parts[1])?,
            parse_small(parts[2])?,
        );
        let max_head = match parts.get(3) {
            Some(p) => parse_small(p)?,
            None => DEFAULT_MAX_HEAD,
        };
        let max_sector = match parts.get(4) {
            Some(p) => parse_small(p)?,
            None => DEFAULT_MAX_SECTOR,
        };

        Ok(Self {
            chs,
            max_head,
            max_sector,
        })
    }

    pub fn to_lba(&self) -> Result<u128, GeometryError> {
        chs_to_lba(
            self.chs.cylinder,
            self.chs.head,
            self.chs.sector,
            self.max_head,
            self.max_sector,
        )
    }
}

/// Parsed `L[-MH[-MS]]` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LbaParams {
    pub lba: u128,
    pub max_head: u64,
    pub max_sector: u64,
}

impl LbaParams {
    pub fn parse(params: &str) -> Result<Self, GeometryError> {
        let parts = split_params(params, 3)?;
        let Some(first) = parts.first() else {
            return Err(GeometryError::MissingLba);
        };

        let lba = parse_component(first)?;
        let max_head = match parts.get(1) {
            Some(p) => parse_small(p)?,
            None => DEFAULT_MAX_HEAD,
        };
        let max_sector = match parts.get(2) {
            Some(p) => parse_small(p)?,
            None => DEFAULT_MAX_SECTOR,
        };

        Ok(Self {
            lba,
            max_head,
            max_sector,
        })
    }

    pub fn to_chs(&self) -> Result<Chs, GeometryError> {
        lba_to_chs(self.lba, self.max_head, self.max_sector)
    }
}

/// A geometry conversion selected by its leading letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryRequest {
    /// `c<C-H-S[-MH[-MS]]>`
    ChsToLba(ChsParams),
    /// `l<L[-MH[-MS]]>`
    LbaToChs(LbaParams),
}

impl GeometryRequest {
    pub fn parse(loc: &str) -> Result<Self, GeometryError> {
        let loc = loc.trim();
        let mut chars = loc.chars();
        match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('c') => Ok(Self::ChsToLba(ChsParams::parse(chars.as_str())?)),
            Some('l') => Ok(Self::LbaToChs(LbaParams::parse(chars.as_str())?)),
            _ => Err(GeometryError::InvalidInput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_params() {
        assert!(split_params("", 3).unwrap().is_empty());
        assert_eq!(split_params("1-2", 3).unwrap(), vec!["1", "2"]);
        assert_eq!(
            split_params("1-2-3-4", 3),
            Err(GeometryError::InvalidComponent("4".into()))
        );
    }
}
