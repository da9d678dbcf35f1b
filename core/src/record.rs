//! Transaction records: the immutable ground truth of the dashboard.
//!
//! Every categorical field is a closed enumeration. Each enum exposes an
//! `ALL` table in its fixed display order; breakdowns iterate that table
//! instead of scanning the data, so unseen categories still get a row.
//!
//! Deserialization accepts the canonical English names as well as the
//! French labels used by the legacy export ("Panier récupéré", ...).

use crate::{
    error::{DashError, DashResult},
    types::{Month, OrderNumber, Year},
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind:  &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

// ── Cart status ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartStatus {
    #[serde(alias = "Panier récupéré")]
    Recovered,
    #[serde(alias = "Abandonné")]
    Abandoned,
    #[serde(alias = "En attente")]
    Pending,
}

impl CartStatus {
    pub const ALL: [CartStatus; 3] = [Self::Recovered, Self::Abandoned, Self::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recovered => "Recovered",
            Self::Abandoned => "Abandoned",
            Self::Pending   => "Pending",
        }
    }
}

impl FromStr for CartStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Recovered" | "Panier récupéré" => Ok(Self::Recovered),
            "Abandoned" | "Abandonné"       => Ok(Self::Abandoned),
            "Pending"   | "En attente"      => Ok(Self::Pending),
            other => Err(UnknownVariant::new("status", other)),
        }
    }
}

// ── Marketing action ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketingAction {
    #[serde(alias = "Relancé par email")]
    EmailFollowUp,
    #[serde(alias = "Retargeting pub")]
    Retargeting,
    #[serde(alias = "Offre spéciale envoyée")]
    SpecialOffer,
    #[serde(alias = "Remise appliquée")]
    DiscountApplied,
}

impl MarketingAction {
    pub const ALL: [MarketingAction; 4] = [
        Self::EmailFollowUp,
        Self::Retargeting,
        Self::SpecialOffer,
        Self::DiscountApplied,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailFollowUp   => "EmailFollowUp",
            Self::Retargeting     => "Retargeting",
            Self::SpecialOffer    => "SpecialOffer",
            Self::DiscountApplied => "DiscountApplied",
        }
    }

    /// Actions that count towards the recovery-after-marketing KPI.
    /// A discount applied at checkout is not an outbound relaunch.
    pub fn is_relaunch(&self) -> bool {
        matches!(self, Self::EmailFollowUp | Self::Retargeting | Self::SpecialOffer)
    }
}

impl FromStr for MarketingAction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EmailFollowUp"   | "Relancé par email"      => Ok(Self::EmailFollowUp),
            "Retargeting"     | "Retargeting pub"        => Ok(Self::Retargeting),
            "SpecialOffer"    | "Offre spéciale envoyée" => Ok(Self::SpecialOffer),
            "DiscountApplied" | "Remise appliquée"       => Ok(Self::DiscountApplied),
            other => Err(UnknownVariant::new("marketing action", other)),
        }
    }
}

// ── Acquisition channel ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcquisitionChannel {
    Email,
    #[serde(rename = "SEO")]
    Seo,
    #[serde(alias = "Publicité payante")]
    PaidAds,
    #[serde(alias = "Accès direct")]
    Direct,
    #[serde(alias = "Réseaux sociaux")]
    Social,
}

impl AcquisitionChannel {
    /// Fixed enumeration order; also the tie-break order of the channel breakdown.
    pub const ALL: [AcquisitionChannel; 5] = [
        Self::Email,
        Self::Seo,
        Self::PaidAds,
        Self::Direct,
        Self::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email   => "Email",
            Self::Seo     => "SEO",
            Self::PaidAds => "PaidAds",
            Self::Direct  => "Direct",
            Self::Social  => "Social",
        }
    }
}

impl FromStr for AcquisitionChannel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Email"                         => Ok(Self::Email),
            "SEO"                           => Ok(Self::Seo),
            "PaidAds" | "Publicité payante" => Ok(Self::PaidAds),
            "Direct"  | "Accès direct"      => Ok(Self::Direct),
            "Social"  | "Réseaux sociaux"   => Ok(Self::Social),
            other => Err(UnknownVariant::new("acquisition channel", other)),
        }
    }
}

// ── Device type ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Mobile,
    Desktop,
    #[serde(alias = "Tablette")]
    Tablet,
}

impl DeviceType {
    pub const ALL: [DeviceType; 3] = [Self::Mobile, Self::Desktop, Self::Tablet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile  => "Mobile",
            Self::Desktop => "Desktop",
            Self::Tablet  => "Tablet",
        }
    }
}

impl FromStr for DeviceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mobile"              => Ok(Self::Mobile),
            "Desktop"             => Ok(Self::Desktop),
            "Tablet" | "Tablette" => Ok(Self::Tablet),
            other => Err(UnknownVariant::new("device type", other)),
        }
    }
}

// ── Client type ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    #[serde(alias = "Nouveau visiteur")]
    NewVisitor,
    #[serde(alias = "Client récurrent")]
    ReturningClient,
}

impl ClientType {
    pub const ALL: [ClientType; 2] = [Self::NewVisitor, Self::ReturningClient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewVisitor      => "NewVisitor",
            Self::ReturningClient => "ReturningClient",
        }
    }
}

impl FromStr for ClientType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NewVisitor"      | "Nouveau visiteur" => Ok(Self::NewVisitor),
            "ReturningClient" | "Client récurrent" => Ok(Self::ReturningClient),
            other => Err(UnknownVariant::new("client type", other)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_as_str!(CartStatus, MarketingAction, AcquisitionChannel, DeviceType, ClientType);

// ── Record ───────────────────────────────────────────────────────────────────

/// One transaction attempt with a terminal cart status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub order_number:        OrderNumber,
    pub product:             String,
    pub client:              String,
    pub country:             String,
    pub city:                String,
    pub price:               f64,
    pub status:              CartStatus,
    #[serde(default, deserialize_with = "empty_action_as_none")]
    pub actions:             Option<MarketingAction>,
    pub acquisition_channel: AcquisitionChannel,
    pub device_type:         DeviceType,
    pub client_type:         ClientType,
    pub year:                Year,
    pub month:               Month,
    pub day:                 u8,
    /// Event time as "HH:MM".
    pub hour:                String,
}

impl Record {
    pub fn is_recovered(&self) -> bool {
        self.status == CartStatus::Recovered
    }

    pub fn is_abandoned(&self) -> bool {
        self.status == CartStatus::Abandoned
    }

    /// A cart that reached a terminal outcome. Pending records are not carts.
    pub fn is_cart(&self) -> bool {
        self.is_recovered() || self.is_abandoned()
    }

    /// Recovered thanks to an outbound marketing relaunch.
    pub fn recovered_after_marketing(&self) -> bool {
        self.is_recovered() && self.actions.is_some_and(|a| a.is_relaunch())
    }

    /// Loader-side validation. The filter engine assumes records passed it.
    pub fn validate(&self) -> DashResult<()> {
        let invalid = |reason: String| DashError::InvalidRecord {
            order_number: self.order_number.clone(),
            reason,
        };

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid(format!("price {} is not a non-negative amount", self.price)));
        }
        if !(1..=12).contains(&self.month) {
            return Err(invalid(format!("month {} out of range 1-12", self.month)));
        }
        if NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32).is_none() {
            return Err(invalid(format!(
                "{}-{:02}-{:02} is not a calendar date",
                self.year, self.month, self.day
            )));
        }
        if NaiveTime::parse_from_str(&self.hour, "%H:%M").is_err() {
            return Err(invalid(format!("hour '{}' is not HH:MM", self.hour)));
        }
        Ok(())
    }
}

fn empty_action_as_none<'de, D>(deserializer: D) -> Result<Option<MarketingAction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
