//! Order status and its display metadata.

use serde::{Deserialize, Serialize};

/// Lifecycle of a bakery order.
///
/// Transitions happen only on the backend; the storefront just displays
/// whatever status the backend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    New,
    InProcess,
    Completed,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::New, Self::InProcess, Self::Completed];

    /// Wire value used by the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProcess => "in_process",
            Self::Completed => "completed",
        }
    }

    /// Display metadata for this status.
    #[must_use]
    pub const fn meta(&self) -> &'static StatusMeta {
        match self {
            Self::New => &NEW_META,
            Self::InProcess => &IN_PROCESS_META,
            Self::Completed => &COMPLETED_META,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_process" => Ok(Self::InProcess),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Icon shown next to a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusIcon {
    Clock,
    Truck,
    CheckCircle,
}

impl StatusIcon {
    /// Name of the icon in the static sprite sheet.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Truck => "truck",
            Self::CheckCircle => "check-circle",
        }
    }
}

/// How a status is presented on the order tracking page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMeta {
    /// Customer-facing label.
    pub label: &'static str,
    pub icon: StatusIcon,
    /// Color tone, used as a CSS modifier (`badge-yellow`).
    pub tone: &'static str,
    /// Progress bar fill, 0-100.
    pub progress: u8,
}

const NEW_META: StatusMeta = StatusMeta {
    label: "Nuevo",
    icon: StatusIcon::Clock,
    tone: "yellow",
    progress: 25,
};

const IN_PROCESS_META: StatusMeta = StatusMeta {
    label: "En proceso",
    icon: StatusIcon::Truck,
    tone: "blue",
    progress: 60,
};

const COMPLETED_META: StatusMeta = StatusMeta {
    label: "Completado",
    icon: StatusIcon::CheckCircle,
    tone: "green",
    progress: 100,
};

impl StatusMeta {
    /// Look up metadata for a raw status string from the backend.
    ///
    /// Unknown values fall back to the metadata of [`OrderStatus::default`].
    #[must_use]
    pub fn for_raw(raw: &str) -> &'static Self {
        raw.parse::<OrderStatus>().unwrap_or_default().meta()
    }
}
