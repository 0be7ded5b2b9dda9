//! Error types
//!
//! Storage failures are logged and recovered from; shop refusals are shown
//! to the player.

use std::fmt;

use crate::upgrades::ShopItem;

/// Failure talking to a storage backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// Backend is not reachable (no window, storage disabled, bad directory)
    Unavailable(String),
    /// Read failed
    Read { key: String, reason: String },
    /// Write failed (quota, permissions)
    Write { key: String, reason: String },
    /// Value could not be encoded
    Encode(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Read { key, reason } => write!(f, "failed to read '{key}': {reason}"),
            Self::Write { key, reason } => write!(f, "failed to write '{key}': {reason}"),
            Self::Encode(reason) => write!(f, "failed to encode value: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Reasons a shop purchase is refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShopError {
    /// The active variant does not sell this item
    NotOffered(ShopItem),
    /// One-off upgrade already bought
    AlreadyOwned(ShopItem),
    /// Levelled upgrade already at its cap
    MaxLevel { item: ShopItem, max: u8 },
    /// Bank does not cover the price
    InsufficientScore { cost: u64, available: u64 },
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOffered(item) => write!(f, "{} is not sold in this mode", item.name()),
            Self::AlreadyOwned(item) => write!(f, "{} already purchased", item.name()),
            Self::MaxLevel { item, max } => {
                write!(f, "{} is already at max level ({max})", item.name())
            }
            Self::InsufficientScore { cost, available } => {
                write!(f, "not enough score: need {cost}, have {available}")
            }
        }
    }
}

impl std::error::Error for ShopError {}
