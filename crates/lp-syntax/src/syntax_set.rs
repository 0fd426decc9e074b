//! Compact bitset over [`SyntaxKind`], usable in `const` grammar tables.

use crate::SyntaxKind;

const SIZE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet {
    bits: [u64; SIZE],
}

impl SyntaxSet {
    pub const EMPTY: Self = Self { bits: [0; SIZE] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    const fn from_kind(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;

        debug_assert!(
            slot_index < SIZE,
            "SyntaxKind outgrew the bitset, increase SIZE"
        );

        let mut bits = Self::EMPTY.bits;
        bits[slot_index] = 1 << (kind % Self::BITS_PER_SLOT);
        Self { bits }
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < kinds.len() {
            set = set.union(&Self::from_kind(kinds[i]));
            i += 1;
        }
        set
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;
        while i < SIZE {
            self.bits[i] |= other.bits[i];
            i += 1;
        }
        self
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;
        let mask = 1 << (kind % Self::BITS_PER_SLOT);
        self.bits[slot_index] & mask != 0
    }

    /// Kinds in the set, in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = SyntaxKind> + '_ {
        SyntaxKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_kind_fits() {
        let last = SyntaxKind::ALL[SyntaxKind::ALL.len() - 1];
        assert!((last as usize) < SIZE * 64);
    }

    #[test]
    fn union_and_contains() {
        let signs = SyntaxSet::new([SyntaxKind::PLUS, SyntaxKind::MINUS]);
        let all = signs.union(&SyntaxSet::new([SyntaxKind::ERROR]));

        assert!(signs.contains(SyntaxKind::PLUS));
        assert!(!signs.contains(SyntaxKind::ERROR));
        assert!(all.contains(SyntaxKind::ERROR));
        assert_eq!(
            all.iter().collect::<Vec<_>>(),
            vec![SyntaxKind::PLUS, SyntaxKind::MINUS, SyntaxKind::ERROR]
        );
    }

    #[test]
    fn empty_contains_nothing() {
        assert!(SyntaxKind::ALL
            .iter()
            .all(|kind| !SyntaxSet::EMPTY.contains(*kind)));
    }
}
