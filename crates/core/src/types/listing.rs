//! Listing enums shared by both listing kinds.

use serde::{Deserialize, Serialize};

/// The two listing kinds, stored in parallel collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// A physical good with a condition and a sale status.
    Marketplace,
    /// Custom work with an availability toggle.
    Commission,
}

impl ListingKind {
    /// Wire name of the kind, as used in paths and the `type` discriminant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marketplace => "marketplace",
            Self::Commission => "commission",
        }
    }
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListingKind {
    type Err = String;

    /// Case-insensitive; clients send the kind in path segments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "marketplace" => Ok(Self::Marketplace),
            "commission" => Ok(Self::Commission),
            _ => Err(format!("invalid item type: {s}")),
        }
    }
}

/// Condition of a marketplace item.
///
/// Serialized with the human-readable labels the clients display
/// (`"Like New"`, not `"like_new"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCondition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
}

impl ItemCondition {
    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::LikeNew => "Like New",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }
}

impl std::fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "like new" => Ok(Self::LikeNew),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            _ => Err(format!("invalid condition: {s}")),
        }
    }
}

/// Conventional marketplace sale statuses.
///
/// The status column itself is free-form text: the update boundary writes any
/// owner-supplied non-empty string verbatim, and no transition graph is
/// enforced. This enum names the values the clients actually send and the
/// initial state for new items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MarketplaceStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl MarketplaceStatus {
    /// Display label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Pending => "Pending",
            Self::Sold => "Sold",
        }
    }
}

impl std::fmt::Display for MarketplaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MarketplaceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "sold" => Ok(Self::Sold),
            _ => Err(format!("unknown status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_kind_parse_case_insensitive() {
        assert_eq!(
            "Marketplace".parse::<ListingKind>().unwrap(),
            ListingKind::Marketplace
        );
        assert_eq!(
            "COMMISSION".parse::<ListingKind>().unwrap(),
            ListingKind::Commission
        );
        assert!("sublet".parse::<ListingKind>().is_err());
    }

    #[test]
    fn test_listing_kind_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ListingKind::Marketplace).unwrap(),
            "\"marketplace\""
        );
        let kind: ListingKind = serde_json::from_str("\"commission\"").unwrap();
        assert_eq!(kind, ListingKind::Commission);
    }

    #[test]
    fn test_condition_labels() {
        assert_eq!(
            serde_json::to_string(&ItemCondition::LikeNew).unwrap(),
            "\"Like New\""
        );
        assert_eq!(
            "like new".parse::<ItemCondition>().unwrap(),
            ItemCondition::LikeNew
        );
        assert!("mint".parse::<ItemCondition>().is_err());
    }

    #[test]
    fn test_status_default_is_available() {
        assert_eq!(MarketplaceStatus::default(), MarketplaceStatus::Available);
        assert_eq!(MarketplaceStatus::Available.as_str(), "Available");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "sold".parse::<MarketplaceStatus>().unwrap(),
            MarketplaceStatus::Sold
        );
        assert!("gone".parse::<MarketplaceStatus>().is_err());
    }
}
