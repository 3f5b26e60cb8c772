use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fold_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringStatus {
    Active,
    Paused,
}

impl MonitoringStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringFrequency {
    Realtime,
    Daily,
    Weekly,
}

impl MonitoringFrequency {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "realtime" => Some(Self::Realtime),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// A tracked external company, owned by exactly one dashboard user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub industry: Option<String>,
    pub status: MonitoringStatus,
    pub monitoring_frequency: MonitoringFrequency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A configured handle on one platform for a competitor.
///
/// `platform` is kept as stored; use [`Platform::parse`] to resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    pub id: i64,
    pub competitor_id: i64,
    pub platform: String,
    pub handle: String,
    pub url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Social platforms a competitor account may live on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Twitter,
    Facebook,
    Instagram,
    Reddit,
    Bluesky,
    TruthSocial,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Reddit,
        Platform::Bluesky,
        Platform::TruthSocial,
    ];

    /// Resolves a stored or user-supplied platform name. Case and surrounding
    /// whitespace are ignored; `x` and `truth social` are accepted aliases.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "linkedin" => Some(Self::LinkedIn),
            "twitter" | "x" => Some(Self::Twitter),
            "facebook" => Some(Self::Facebook),
            "instagram" => Some(Self::Instagram),
            "reddit" => Some(Self::Reddit),
            "bluesky" => Some(Self::Bluesky),
            "truthsocial" | "truth_social" => Some(Self::TruthSocial),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Reddit => "reddit",
            Self::Bluesky => "bluesky",
            Self::TruthSocial => "truthsocial",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
