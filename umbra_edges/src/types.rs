// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the edge graph: identifiers, channels, senses, sides,
//! kinds, and threshold data.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use core::fmt;

/// Identifier of an edge, used as the key in
/// [`CanvasEdges`](crate::CanvasEdges).
///
/// By convention ids are scoped as `"<source>.<id>"` (for example
/// `wall.kDgrt3qz` or `outerBounds.top`) so that edges contributed by
/// different source types cannot collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(String);

impl EdgeId {
    /// Create an id from an arbitrary string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a scoped id of the form `"<source>.<id>"`.
    pub fn scoped(source: &str, id: &str) -> Self {
        Self(format!("{source}.{id}"))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque, non-owning handle to the domain object an edge was derived from.
///
/// The value is an index into whatever store the caller owns (for example a
/// wall arena). Edge lifetime is fully decoupled from the referenced
/// object's lifetime; a dangling handle is the caller's concern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// One of the four effect types an edge can independently restrict.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Illumination.
    Light,
    /// Physical movement.
    Movement,
    /// Line of sight.
    Sight,
    /// Sound propagation.
    Sound,
}

impl Channel {
    /// All channels, in a fixed order.
    pub const ALL: [Self; 4] = [Self::Light, Self::Movement, Self::Sight, Self::Sound];
}

/// Strength of an edge's restriction for a channel.
///
/// The ordering is semantic: `None < Limited < Normal`, with `Proximity` and
/// `Distance` as threshold-modulated modes above `Normal`. Discriminants
/// leave room between levels for future insertion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Sense {
    /// The edge does not restrict the channel.
    #[default]
    None = 0,
    /// The effect passes through a bounded number of such edges.
    Limited = 10,
    /// The edge blocks the channel.
    Normal = 20,
    /// Blocks, except for sources within the threshold distance.
    Proximity = 30,
    /// Blocks, except for sources beyond the threshold distance.
    Distance = 40,
}

bitflags::bitflags! {
    /// Sides of a directed segment `a -> b`.
    ///
    /// Used both as an edge's `direction` (which approach sides it blocks)
    /// and as the result of [`Edge::orient_point`](crate::Edge::orient_point),
    /// where a collinear point reports [`Side::BOTH`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Side: u8 {
        /// The side where the cross product `(b - a) x (p - a)` is positive.
        const LEFT  = 0b0000_0001;
        /// The side where the cross product is negative.
        const RIGHT = 0b0000_0010;
        /// Both sides.
        const BOTH = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Default for Side {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Tag distinguishing ordinary edges from special boundary edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// An edge derived from a wall-like domain object.
    #[default]
    Wall,
    /// An edge contributed by a darkness-emitting source.
    Darkness,
    /// One of the four outer canvas boundary edges.
    OuterBounds,
    /// One of the four inner (padding-inset) scene boundary edges.
    InnerBounds,
}

impl EdgeKind {
    /// Boundary kinds are held outside the spatial index.
    pub const fn is_boundary(self) -> bool {
        matches!(self, Self::OuterBounds | Self::InnerBounds)
    }
}

/// Per-channel proximity threshold distances plus an attenuation flag.
///
/// A configured distance only has an effect when the matching channel's
/// sense is [`Sense::Proximity`] or [`Sense::Distance`]; see
/// [`Edge::apply_threshold`](crate::Edge::apply_threshold).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Threshold {
    /// Threshold distance for the light channel.
    pub light: Option<f64>,
    /// Threshold distance for the movement channel.
    pub movement: Option<f64>,
    /// Threshold distance for the sight channel.
    pub sight: Option<f64>,
    /// Threshold distance for the sound channel.
    pub sound: Option<f64>,
    /// Whether effects attenuate past the threshold rather than cutting off.
    /// Carried for consumers; the edge graph itself does not interpret it.
    pub attenuation: bool,
}

impl Threshold {
    /// The configured distance for `channel`, if any.
    pub fn distance(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Light => self.light,
            Channel::Movement => self.movement,
            Channel::Sight => self.sight,
            Channel::Sound => self.sound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sense_ordering_is_semantic() {
        assert!(Sense::None < Sense::Limited);
        assert!(Sense::Limited < Sense::Normal);
        assert!(Sense::Normal < Sense::Proximity);
        assert!(Sense::Proximity < Sense::Distance);
    }

    #[test]
    fn side_default_is_both() {
        assert_eq!(Side::default(), Side::BOTH);
        assert!(Side::BOTH.contains(Side::LEFT));
        assert!(Side::BOTH.contains(Side::RIGHT));
    }

    #[test]
    fn scoped_ids() {
        let id = EdgeId::scoped("wall", "abc123");
        assert_eq!(id.as_str(), "wall.abc123");
        assert_eq!(EdgeId::from("wall.abc123"), id);
    }

    #[test]
    fn boundary_kinds() {
        assert!(EdgeKind::OuterBounds.is_boundary());
        assert!(EdgeKind::InnerBounds.is_boundary());
        assert!(!EdgeKind::Wall.is_boundary());
        assert!(!EdgeKind::Darkness.is_boundary());
    }
}
