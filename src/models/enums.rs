//! Shared domain enums stored as upper-case TEXT columns

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Implements `as_str`, `Display`, `FromStr` and the sqlx TEXT mapping for a
/// unit enum whose variants are stored under a fixed label.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_uppercase().as_str() {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = sqlx::Decode::<sqlx::Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    Organizer,
    Staff,
    User,
}

text_enum!(Role {
    Admin => "ADMIN",
    Manager => "MANAGER",
    Organizer => "ORGANIZER",
    Staff => "STAFF",
    User => "USER",
});

impl Role {
    /// Admins and managers review events, communications and reports
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Everyone except plain users receives workflow notifications
    pub fn receives_workflow_mail(&self) -> bool {
        !matches!(self, Role::User)
    }

    /// Roles allowed to act on behalf of other users (registrations, user lookups)
    pub fn is_staff_level(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager | Role::Staff)
    }
}

// ---------------------------------------------------------------------------
// EventStatus
// ---------------------------------------------------------------------------

/// Event lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
    NeedsRevision,
}

text_enum!(EventStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
    Cancelled => "CANCELLED",
    Completed => "COMPLETED",
    NeedsRevision => "NEEDS_REVISION",
});

impl EventStatus {
    /// PENDING -> APPROVED
    pub fn approve(self) -> Result<EventStatus, String> {
        match self {
            EventStatus::Pending => Ok(EventStatus::Approved),
            _ => Err("Only pending events can be approved.".to_string()),
        }
    }

    /// PENDING -> NEEDS_REVISION
    pub fn reject(self) -> Result<EventStatus, String> {
        match self {
            EventStatus::Pending => Ok(EventStatus::NeedsRevision),
            _ => Err("Only pending events can be rejected.".to_string()),
        }
    }

    /// Status an event takes after its creator or an organizer edits it.
    /// A rejected-for-revision event is resubmitted; anything else keeps its state.
    pub fn after_edit(self) -> EventStatus {
        match self {
            EventStatus::NeedsRevision => EventStatus::Pending,
            other => other,
        }
    }

    /// Whether the event creator may move the event to `next` by themselves
    pub fn creator_may_set(self, next: EventStatus) -> bool {
        self == next || (self == EventStatus::Pending && next == EventStatus::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// RegistrationStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationStatus {
    Confirmed,
    Cancelled,
}

text_enum!(RegistrationStatus {
    Confirmed => "CONFIRMED",
    Cancelled => "CANCELLED",
});

// ---------------------------------------------------------------------------
// Communications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationStatus {
    Draft,
    Pending,
    Published,
    Rejected,
    NeedsRevision,
}

text_enum!(CommunicationStatus {
    Draft => "DRAFT",
    Pending => "PENDING",
    Published => "PUBLISHED",
    Rejected => "REJECTED",
    NeedsRevision => "NEEDS_REVISION",
});

impl CommunicationStatus {
    /// Result of submitting for review; only drafts and returned items move.
    pub fn submit(self) -> CommunicationStatus {
        match self {
            CommunicationStatus::Draft | CommunicationStatus::NeedsRevision => {
                CommunicationStatus::Pending
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommunicationType {
    News,
    Announcement,
    Event,
}

text_enum!(CommunicationType {
    News => "NEWS",
    Announcement => "ANNOUNCEMENT",
    Event => "EVENT",
});

// ---------------------------------------------------------------------------
// Event reports / news
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventReportStatus {
    Pending,
    Approved,
    Rejected,
}

text_enum!(EventReportStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum NewsStatus {
    Active,
    Inactive,
}

text_enum!(NewsStatus {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_only_from_pending() {
        assert_eq!(EventStatus::Pending.approve(), Ok(EventStatus::Approved));
        for status in EventStatus::ALL.iter().filter(|s| **s != EventStatus::Pending) {
            assert!(status.approve().is_err(), "{} should not be approvable", status);
        }
    }

    #[test]
    fn test_reject_only_from_pending() {
        assert_eq!(EventStatus::Pending.reject(), Ok(EventStatus::NeedsRevision));
        assert!(EventStatus::Approved.reject().is_err());
        assert!(EventStatus::NeedsRevision.reject().is_err());
        assert!(EventStatus::Cancelled.reject().is_err());
    }

    #[test]
    fn test_edit_resubmits_revision() {
        assert_eq!(EventStatus::NeedsRevision.after_edit(), EventStatus::Pending);
        assert_eq!(EventStatus::Approved.after_edit(), EventStatus::Approved);
        assert_eq!(EventStatus::Pending.after_edit(), EventStatus::Pending);
    }

    #[test]
    fn test_creator_may_only_cancel_pending() {
        assert!(EventStatus::Pending.creator_may_set(EventStatus::Cancelled));
        assert!(EventStatus::Pending.creator_may_set(EventStatus::Pending));
        assert!(!EventStatus::Pending.creator_may_set(EventStatus::Approved));
        assert!(!EventStatus::Approved.creator_may_set(EventStatus::Cancelled));
    }

    #[test]
    fn test_status_labels_round_trip() {
        assert_eq!("needs_revision".parse::<EventStatus>(), Ok(EventStatus::NeedsRevision));
        assert_eq!(EventStatus::NeedsRevision.to_string(), "NEEDS_REVISION");
        assert_eq!(
            serde_json::to_string(&EventStatus::NeedsRevision).unwrap(),
            "\"NEEDS_REVISION\""
        );
        assert!("UNKNOWN".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Admin.can_review());
        assert!(Role::Manager.can_review());
        assert!(!Role::Organizer.can_review());
        assert!(!Role::User.receives_workflow_mail());
        assert!(Role::Staff.receives_workflow_mail());
        assert!(Role::Staff.is_staff_level());
        assert!(!Role::Organizer.is_staff_level());
    }

    #[test]
    fn test_communication_submit() {
        assert_eq!(CommunicationStatus::Draft.submit(), CommunicationStatus::Pending);
        assert_eq!(CommunicationStatus::NeedsRevision.submit(), CommunicationStatus::Pending);
        assert_eq!(CommunicationStatus::Published.submit(), CommunicationStatus::Published);
        assert_eq!(CommunicationStatus::Rejected.submit(), CommunicationStatus::Rejected);
    }
}
