use crate::texture::{TextureHandle, TextureId};

/// Texture units available to one batch.
pub const MAX_TEXTURE_SLOTS: usize = 32;

/// Every slot is taken by a different texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("all {MAX_TEXTURE_SLOTS} texture slots are occupied")]
pub struct TextureSlotOverflow;

/// Maps textures to texture units for the current batch.
///
/// Slots fill in order and each texture id appears at most once.
#[derive(Debug, Clone)]
pub struct TextureSlots<T> {
    slots: Vec<T>,
}

impl<T: TextureHandle> Default for TextureSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TextureHandle> TextureSlots<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(MAX_TEXTURE_SLOTS),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= MAX_TEXTURE_SLOTS
    }

    pub fn find(&self, id: TextureId) -> Option<usize> {
        self.slots.iter().position(|t| t.id() == id)
    }

    /// Returns the slot already holding `texture`, or claims the next free one.
    pub fn try_insert(&mut self, texture: &T) -> Result<usize, TextureSlotOverflow> {
        if let Some(slot) = self.find(texture.id()) {
            return Ok(slot);
        }
        if self.is_full() {
            return Err(TextureSlotOverflow);
        }
        self.slots.push(texture.clone());
        Ok(self.slots.len() - 1)
    }

    /// Occupied slots with their unit index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Tex(u64);

    impl TextureHandle for Tex {
        fn id(&self) -> TextureId {
            TextureId::from_raw(self.0)
        }
        fn width(&self) -> u32 {
            1
        }
        fn height(&self) -> u32 {
            1
        }
    }

    #[test]
    fn same_texture_reuses_slot() {
        let mut slots = TextureSlots::new();
        assert_eq!(slots.try_insert(&Tex(7)), Ok(0));
        assert_eq!(slots.try_insert(&Tex(8)), Ok(1));
        assert_eq!(slots.try_insert(&Tex(7)), Ok(0));
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn overflow_after_32_distinct() {
        let mut slots = TextureSlots::new();
        for i in 0..MAX_TEXTURE_SLOTS as u64 {
            assert_eq!(slots.try_insert(&Tex(i)), Ok(i as usize));
        }
        assert!(slots.is_full());
        assert_eq!(slots.try_insert(&Tex(999)), Err(TextureSlotOverflow));
        // Known textures still resolve when full.
        assert_eq!(slots.try_insert(&Tex(31)), Ok(31));
        assert_eq!(slots.len(), MAX_TEXTURE_SLOTS);
    }

    #[test]
    fn clear_frees_all_slots() {
        let mut slots = TextureSlots::new();
        slots.try_insert(&Tex(1)).unwrap();
        slots.clear();
        assert!(slots.is_empty());
        assert_eq!(slots.find(TextureId::from_raw(1)), None);
    }
}
