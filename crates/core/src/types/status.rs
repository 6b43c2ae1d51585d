//! Status and category enums for the dashboard entities.
//!
//! Every enum here is stored as `TEXT` and travels as the same lowercase
//! snake_case string over JSON, so the `text_enum!` macro generates the
//! string mapping once: `as_str`, `Display`, `FromStr`, serde and (with the
//! `postgres` feature) the `sqlx` text encoding.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    /// Human-readable name of the enum.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stored string form.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(s.parse()?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    /// Admin role with different permission levels.
    AdminRole ("admin role") {
        /// Full access including admin user management.
        SuperAdmin => "super_admin",
        /// Full access to content and records.
        Admin => "admin",
        /// Content and record editing.
        Editor => "editor",
    }
}

text_enum! {
    /// Lifecycle of a program.
    #[derive(Default)]
    ProgramStatus ("program status") {
        #[default]
        Active => "active",
        Inactive => "inactive",
        Completed => "completed",
    }
}

text_enum! {
    /// Work area a program belongs to.
    ProgramCategory ("program category") {
        TempleRestoration => "temple_restoration",
        Goshala => "goshala",
        WomenEmpowerment => "women_empowerment",
        SkillDevelopment => "skill_development",
        ChildHomes => "child_homes",
        Ayurveda => "ayurveda",
    }
}

text_enum! {
    /// Publication state of a story.
    #[derive(Default)]
    StoryStatus ("story status") {
        #[default]
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

text_enum! {
    /// Kind of story.
    StoryCategory ("story category") {
        ImpactStory => "impact_story",
        Blog => "blog",
        News => "news",
        Testimonial => "testimonial",
    }
}

text_enum! {
    /// Gallery grouping.
    GalleryCategory ("gallery category") {
        Temple => "temple",
        Goshala => "goshala",
        Women => "women",
        Children => "children",
        Events => "events",
        Training => "training",
        General => "general",
    }
}

text_enum! {
    /// Lifecycle of an event.
    #[derive(Default)]
    EventStatus ("event status") {
        #[default]
        Upcoming => "upcoming",
        Ongoing => "ongoing",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// Kind of event.
    EventType ("event type") {
        Fundraising => "fundraising",
        Awareness => "awareness",
        Training => "training",
        Celebration => "celebration",
        Volunteer => "volunteer",
        Other => "other",
    }
}

text_enum! {
    /// How often a donation recurs.
    #[derive(Default)]
    DonationType ("donation type") {
        #[default]
        OneTime => "one_time",
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

text_enum! {
    /// Cause a donation is earmarked for.
    #[derive(Default)]
    DonationPurpose ("donation purpose") {
        #[default]
        General => "general",
        TempleRestoration => "temple_restoration",
        Goshala => "goshala",
        WomenEmpowerment => "women_empowerment",
        ChildHomes => "child_homes",
        Emergency => "emergency",
    }
}

text_enum! {
    /// Settlement state of a donation. Only completed donations count towards totals.
    #[derive(Default)]
    PaymentStatus ("payment status") {
        #[default]
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
        Refunded => "refunded",
    }
}

text_enum! {
    /// How a donation was paid.
    #[derive(Default)]
    PaymentMethod ("payment method") {
        #[default]
        Online => "online",
        BankTransfer => "bank_transfer",
        Cash => "cash",
        Cheque => "cheque",
    }
}

text_enum! {
    /// Self-reported volunteer experience.
    #[derive(Default)]
    ExperienceLevel ("experience level") {
        #[default]
        Beginner => "beginner",
        Intermediate => "intermediate",
        Experienced => "experienced",
    }
}

text_enum! {
    /// Volunteer background check outcome.
    #[derive(Default)]
    BackgroundCheckStatus ("background check status") {
        #[default]
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

text_enum! {
    /// Volunteer standing.
    #[derive(Default)]
    VolunteerStatus ("volunteer status") {
        #[default]
        Active => "active",
        Inactive => "inactive",
        Blocked => "blocked",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_round_trips_through_text() {
        for role in AdminRole::ALL {
            assert_eq!(role.as_str().parse::<AdminRole>().unwrap(), *role);
        }
    }

    #[test]
    fn test_unknown_variant_names_the_enum() {
        let err = "viewer".parse::<AdminRole>().unwrap_err();
        assert_eq!(err.to_string(), "invalid admin role: viewer");
    }

    #[test]
    fn test_serde_uses_stored_form() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"bank_transfer\"");
        let parsed: DonationType = serde_json::from_str("\"one_time\"").unwrap();
        assert_eq!(parsed, DonationType::OneTime);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(StoryStatus::default(), StoryStatus::Draft);
        assert_eq!(EventStatus::default(), EventStatus::Upcoming);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(DonationPurpose::default(), DonationPurpose::General);
    }
}
