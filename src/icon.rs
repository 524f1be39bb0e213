//! Icon capability map.
//!
//! Icons are named by a closed enum and resolved to renderer assets when the
//! map is built, so a lookup can never miss at runtime.

use std::ops::Index;

/// Every icon the journey overlay can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    Planet,
    Trophy,
    Warp,
    SoundOn,
    SoundOff,
    Close,
}

impl IconId {
    pub const COUNT: usize = 6;

    /// All icons, in declaration order.
    pub const ALL: [IconId; Self::COUNT] = [
        IconId::Planet,
        IconId::Trophy,
        IconId::Warp,
        IconId::SoundOn,
        IconId::SoundOff,
        IconId::Close,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

/// A total mapping from [`IconId`] to a renderer-specific asset `A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconMap<A> {
    assets: [A; IconId::COUNT],
}

impl<A> IconMap<A> {
    /// Builds the map by resolving every icon up front.
    pub fn new(mut resolve: impl FnMut(IconId) -> A) -> Self {
        Self {
            assets: std::array::from_fn(|i| resolve(IconId::ALL[i])),
        }
    }

    #[must_use]
    pub fn get(&self, id: IconId) -> &A {
        &self.assets[id.slot()]
    }

    /// Iterates `(id, asset)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (IconId, &A)> {
        IconId::ALL.into_iter().zip(self.assets.iter())
    }
}

impl<A> Index<IconId> for IconMap<A> {
    type Output = A;

    fn index(&self, id: IconId) -> &A {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_declaration_order() {
        for (i, id) in IconId::ALL.into_iter().enumerate() {
            assert_eq!(id.slot(), i);
        }
    }

    #[test]
    fn every_icon_resolves() {
        let map = IconMap::new(|id| format!("{id:?}").to_lowercase());
        assert_eq!(map[IconId::Trophy], "trophy");
        assert_eq!(map.get(IconId::SoundOff), "soundoff");
        assert_eq!(map.iter().count(), IconId::COUNT);
    }
}
