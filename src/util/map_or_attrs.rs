use std::borrow::Cow;

use crate::model::beatmap::Beatmap;

/// Either a beatmap still to be calculated or its already calculated
/// difficulty attributes.
#[derive(Clone, Debug, PartialEq)]
pub enum MapOrAttrs<'map, A> {
    Map(Cow<'map, Beatmap>),
    Attrs(A),
}

impl<A> MapOrAttrs<'_, A> {
    /// Store `attrs` in place of the map and return them.
    pub fn insert_attrs(&mut self, attrs: A) -> A
    where
        A: Clone,
    {
        *self = Self::Attrs(attrs.clone());

        attrs
    }

    pub const fn map(&self) -> Option<&Cow<'_, Beatmap>> {
        match self {
            Self::Map(map) => Some(map),
            Self::Attrs(_) => None,
        }
    }
}

impl<'map, A> From<&'map Beatmap> for MapOrAttrs<'map, A> {
    fn from(map: &'map Beatmap) -> Self {
        Self::Map(Cow::Borrowed(map))
    }
}

impl<A> From<Beatmap> for MapOrAttrs<'_, A> {
    fn from(map: Beatmap) -> Self {
        Self::Map(Cow::Owned(map))
    }
}
