//! Core type definitions for the pane layout tree
//!
//! This module contains the identifier types and enums shared by the
//! layout tree, the pane registry and the workspace coordinator.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pane.
///
/// A pane id is stable for the lifetime of the pane and independent of its
/// position in the layout tree. It is the id of the pane's leaf node and the
/// key of its registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(pub Uuid);

impl PaneId {
    /// Creates a new random pane ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a pane ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pane({})", self.0)
    }
}

/// Unique identifier for a split node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitId(pub Uuid);

impl SplitId {
    /// Creates a new random split ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SplitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Split({})", self.0)
    }
}

/// Identity of any node in the tree.
///
/// Leaf and split ids live in one namespace so that a node can be located
/// again after the tree has been reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// A leaf node, identified by the pane it shows.
    Pane(PaneId),
    /// A split node.
    Split(SplitId),
}

impl From<PaneId> for NodeId {
    fn from(id: PaneId) -> Self {
        Self::Pane(id)
    }
}

impl From<SplitId> for NodeId {
    fn from(id: SplitId) -> Self {
        Self::Split(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pane(id) => id.fmt(f),
            Self::Split(id) => id.fmt(f),
        }
    }
}

/// Direction in which a split lays out its children.
///
/// `Horizontal` places children side by side (left to right), `Vertical`
/// stacks them (top to bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Children arranged left to right.
    Horizontal,
    /// Children arranged top to bottom.
    Vertical,
}

impl fmt::Display for SplitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Side of a target node at which a new or moved node is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropSide {
    /// Insert to the left of the target.
    Left,
    /// Insert to the right of the target.
    Right,
    /// Insert above the target.
    Top,
    /// Insert below the target.
    Bottom,
}

impl DropSide {
    /// Returns the direction of the split created when inserting on this side.
    #[must_use]
    pub const fn direction(self) -> SplitDirection {
        match self {
            Self::Left | Self::Right => SplitDirection::Horizontal,
            Self::Top | Self::Bottom => SplitDirection::Vertical,
        }
    }

    /// Returns true if the inserted node goes before the target.
    #[must_use]
    pub const fn inserts_first(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

impl fmt::Display for DropSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

impl std::str::FromStr for DropSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pane_id_new_creates_unique_ids() {
        let id1 = PaneId::new();
        let id2 = PaneId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn pane_id_equality() {
        let uuid = Uuid::new_v4();
        assert_eq!(PaneId(uuid), PaneId::from_uuid(uuid));
    }

    #[test]
    fn node_id_from_pane_and_split() {
        let pane = PaneId::new();
        let split = SplitId::new();
        assert_eq!(NodeId::from(pane), NodeId::Pane(pane));
        assert_eq!(NodeId::from(split), NodeId::Split(split));
    }

    #[test]
    fn drop_side_direction() {
        assert_eq!(DropSide::Left.direction(), SplitDirection::Horizontal);
        assert_eq!(DropSide::Right.direction(), SplitDirection::Horizontal);
        assert_eq!(DropSide::Top.direction(), SplitDirection::Vertical);
        assert_eq!(DropSide::Bottom.direction(), SplitDirection::Vertical);
    }

    #[test]
    fn drop_side_ordering() {
        assert!(DropSide::Left.inserts_first());
        assert!(DropSide::Top.inserts_first());
        assert!(!DropSide::Right.inserts_first());
        assert!(!DropSide::Bottom.inserts_first());
    }

    #[test]
    fn drop_side_from_str() {
        assert_eq!("LEFT".parse::<DropSide>(), Ok(DropSide::Left));
        assert_eq!("bottom".parse::<DropSide>(), Ok(DropSide::Bottom));
        assert!("center".parse::<DropSide>().is_err());
    }

    #[test]
    fn split_direction_display() {
        assert_eq!(SplitDirection::Horizontal.to_string(), "horizontal");
        assert_eq!(SplitDirection::Vertical.to_string(), "vertical");
    }

    #[test]
    fn pane_id_display() {
        let id = PaneId(Uuid::nil());
        assert!(format!("{id}").contains("Pane("));
    }

    #[test]
    fn pane_id_serializes_as_plain_uuid() {
        let id = PaneId(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
