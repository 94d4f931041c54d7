//! region — фиксированные регионы кучи и учёт их allocation-чанков.
//!
//! Порядок регионов входит в бинарный контракт: он одинаков в generated source
//! и в startup blob (запись и чтение идут строго в порядке `Region::ALL`).
//!
//! Для startup/context снапшотов каждый регион обязан иметь ровно один чанк
//! (резервация региона помещается в одну страницу). Любое другое число чанков
//! — фатальное нарушение инварианта, а не восстанавливаемая ситуация.

use std::fmt;

use crate::consts::REGION_COUNT;
use crate::error::{Result, SnapshotError};
use crate::image::ImageKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Region {
    New = 0,
    OldPointer = 1,
    OldData = 2,
    Code = 3,
    Map = 4,
    Cell = 5,
    PropertyCell = 6,
    Lo = 7,
}

impl Region {
    pub const ALL: [Region; REGION_COUNT] = [
        Region::New,
        Region::OldPointer,
        Region::OldData,
        Region::Code,
        Region::Map,
        Region::Cell,
        Region::PropertyCell,
        Region::Lo,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Suffix used in the generated `<prefix><suffix>_space_used_` constants
    /// and as the key in the regions JSON.
    pub fn suffix(self) -> &'static str {
        match self {
            Region::New => "new",
            Region::OldPointer => "pointer",
            Region::OldData => "data",
            Region::Code => "code",
            Region::Map => "map",
            Region::Cell => "cell",
            Region::PropertyCell => "property_cell",
            Region::Lo => "lo",
        }
    }

    pub fn from_suffix(s: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.suffix() == s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Allocation chunks reported by the serializer for one image.
pub trait RegionAccounting {
    fn chunks_for(&self, region: Region) -> &[u32];
}

/// Единственный чанк региона; число чанков != 1 — `SnapshotError::Invariant`.
pub fn single_chunk_for<A: RegionAccounting + ?Sized>(
    accounting: &A,
    image: ImageKind,
    region: Region,
) -> Result<u32> {
    match accounting.chunks_for(region) {
        [size] => Ok(*size),
        other => Err(SnapshotError::Invariant {
            image,
            region,
            chunks: other.to_vec(),
        }),
    }
}

/// Validated single-chunk sizes of all regions, in `Region::ALL` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionSizes(pub [u32; REGION_COUNT]);

impl RegionSizes {
    /// Проверить все регионы; первый нарушитель прерывает сбор.
    pub fn collect<A: RegionAccounting + ?Sized>(accounting: &A, image: ImageKind) -> Result<Self> {
        let mut sizes = [0u32; REGION_COUNT];
        for region in Region::ALL {
            sizes[region.index()] = single_chunk_for(accounting, image, region)?;
        }
        Ok(RegionSizes(sizes))
    }

    #[inline]
    pub fn get(&self, region: Region) -> u32 {
        self.0[region.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Region, u32)> + '_ {
        Region::ALL.iter().map(move |&r| (r, self.get(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Vec<u32>>);

    impl RegionAccounting for Fixed {
        fn chunks_for(&self, region: Region) -> &[u32] {
            &self.0[region.index()]
        }
    }

    #[test]
    fn order_and_suffixes_are_stable() {
        let names: Vec<&str> = Region::ALL.iter().map(|r| r.suffix()).collect();
        assert_eq!(
            names,
            ["new", "pointer", "data", "code", "map", "cell", "property_cell", "lo"]
        );
        for (i, r) in Region::ALL.iter().enumerate() {
            assert_eq!(r.index(), i);
            assert_eq!(Region::from_suffix(r.suffix()), Some(*r));
        }
        assert_eq!(Region::from_suffix("old_space"), None);
    }

    #[test]
    fn collect_takes_single_chunks_in_order() {
        let acct = Fixed((0..8).map(|i| vec![100 + i]).collect());
        let sizes = RegionSizes::collect(&acct, ImageKind::Startup).unwrap();
        assert_eq!(sizes.0, [100, 101, 102, 103, 104, 105, 106, 107]);
        assert_eq!(sizes.get(Region::Lo), 107);
    }

    #[test]
    fn two_chunks_is_invariant_violation() {
        let mut chunks: Vec<Vec<u32>> = (0..8).map(|_| vec![4096]).collect();
        chunks[Region::Map.index()] = vec![10, 20];
        let err = RegionSizes::collect(&Fixed(chunks), ImageKind::Context).unwrap_err();
        match err {
            SnapshotError::Invariant { image, region, chunks } => {
                assert_eq!(image, ImageKind::Context);
                assert_eq!(region, Region::Map);
                assert_eq!(chunks, vec![10, 20]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_chunks_is_invariant_violation() {
        let mut chunks: Vec<Vec<u32>> = (0..8).map(|_| vec![1]).collect();
        chunks[Region::New.index()].clear();
        let acct = Fixed(chunks);
        assert!(single_chunk_for(&acct, ImageKind::Startup, Region::New).is_err());
        assert_eq!(single_chunk_for(&acct, ImageKind::Startup, Region::Cell).unwrap(), 1);
    }
}
