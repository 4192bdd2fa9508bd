use crate::error::PrioritizerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Open label sets coming from the feedback store. Anything outside the known
/// labels collapses to `Other` when it crosses the deserialization boundary.
macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other,
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+ $name::Other];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other => "Other",
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label().eq_ignore_ascii_case(label.trim()))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match Self::from_label(&value) {
                    Some(known) => known,
                    None => {
                        tracing::warn!(kind = $kind, value = %value, "unrecognized label; using Other");
                        $name::Other
                    }
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled_enum!(Theme, "theme", {
    UxUi => "UX/UI",
    Performance => "Performance",
    FeatureRequest => "Feature Request",
    BugReport => "Bug Report",
    Pricing => "Pricing",
    Onboarding => "Onboarding",
    Documentation => "Documentation",
    Support => "Support",
    Integration => "Integration",
    Security => "Security",
});

labelled_enum!(Persona, "persona", {
    PowerUser => "Power User",
    NewUser => "New User",
    EnterpriseAdmin => "Enterprise Admin",
    Developer => "Developer",
    SmallBusinessOwner => "Small Business Owner",
    CasualUser => "Casual User",
    TechnicalLead => "Technical Lead",
    ProductManager => "Product Manager",
});

labelled_enum!(ProductArea, "product area", {
    Dashboard => "Dashboard",
    Reports => "Reports",
    Settings => "Settings",
    Authentication => "Authentication",
    Api => "API",
    MobileApp => "Mobile App",
    Notifications => "Notifications",
    Billing => "Billing",
    Integrations => "Integrations",
    Search => "Search",
});

impl Default for Theme {
    fn default() -> Self {
        Theme::Other
    }
}

/// Variant order is the triage order: critical sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl FromStr for Importance {
    type Err = PrioritizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(PrioritizerError::unknown("importance", s)),
        }
    }
}

/// Variant order is cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostEstimate {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl CostEstimate {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        }
    }
}

impl FromStr for CostEstimate {
    type Err = PrioritizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very-high" | "very_high" => Ok(Self::VeryHigh),
            _ => Err(PrioritizerError::unknown("cost estimate", s)),
        }
    }
}

/// Strategic fit rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BusinessAlignment(u8);

impl BusinessAlignment {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, PrioritizerError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PrioritizerError::unknown(
                "business alignment",
                value.to_string(),
            ))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for BusinessAlignment {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for BusinessAlignment {
    type Error = PrioritizerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BusinessAlignment> for u8 {
    fn from(value: BusinessAlignment) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub business_alignment: BusinessAlignment,
    #[serde(default)]
    pub cost_estimate: CostEstimate,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_area: Option<ProductArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
}

impl FeedbackItem {
    /// An item carrying the medium defaults for every scoring attribute.
    pub fn new(id: impl Into<String>, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            theme: Theme::default(),
            importance: Importance::default(),
            business_alignment: BusinessAlignment::default(),
            cost_estimate: CostEstimate::default(),
            created_at,
            source: None,
            proposal_link: None,
            persona: None,
            product_area: None,
            feature_id: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.feature_id.is_some()
    }
}
