//! Closed vocabularies used by listings.
//!
//! Each enum has a fixed wire spelling shared by JSON, query strings and the
//! database text columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raised when a string is not one of an enum's spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected one of {expected}")]
pub struct UnknownVariant {
    pub expected: &'static str,
}

macro_rules! wire_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($serde_case:literal) {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = $serde_case)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            const EXPECTED: &'static str = concat!($($wire, " "),+);

            /// Wire and storage spelling.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or(UnknownVariant {
                        expected: Self::EXPECTED.trim_end(),
                    })
            }
        }
    };
}

wire_enum! {
    /// Kind of property on offer.
    pub enum PropertyType ("SCREAMING_SNAKE_CASE") {
        House => "HOUSE",
        Apartment => "APARTMENT",
        Land => "LAND",
    }
}

wire_enum! {
    /// Whether the property is for sale or for rent.
    pub enum ListingType ("SCREAMING_SNAKE_CASE") {
        Sale => "SALE",
        Rent => "RENT",
    }
}

wire_enum! {
    /// Unit the listing area is expressed in.
    pub enum AreaUnit ("lowercase") {
        Sqm => "sqm",
        Sqft => "sqft",
    }
}

wire_enum! {
    /// Lifecycle status. Only [`ListingStatus::Active`] listings are public.
    pub enum ListingStatus ("SCREAMING_SNAKE_CASE") {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        /// Terminal: the property was sold.
        Sold => "SOLD",
        /// Terminal: the property was let.
        Rented => "RENTED",
    }
}

impl Default for AreaUnit {
    fn default() -> Self {
        Self::Sqm
    }
}

impl ListingStatus {
    /// Whether the status ends the listing's market life.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Sold | Self::Rented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("apartment", PropertyType::Apartment)]
    #[case("HOUSE", PropertyType::House)]
    #[case(" Land ", PropertyType::Land)]
    fn property_types_parse_case_insensitively(#[case] raw: &str, #[case] expected: PropertyType) {
        assert_eq!(raw.parse::<PropertyType>(), Ok(expected));
    }

    #[rstest]
    fn unknown_values_list_the_accepted_spellings() {
        let error = "CONDO".parse::<PropertyType>().expect_err("unknown type");
        assert_eq!(error.expected, "HOUSE APARTMENT LAND");
        assert_eq!(error.to_string(), "expected one of HOUSE APARTMENT LAND");
    }

    #[rstest]
    fn serde_uses_wire_spelling() {
        assert_eq!(
            serde_json::to_value(AreaUnit::Sqft).expect("serialise"),
            serde_json::json!("sqft")
        );
        assert_eq!(
            serde_json::from_value::<ListingStatus>(serde_json::json!("RENTED"))
                .expect("deserialise"),
            ListingStatus::Rented
        );
    }

    #[rstest]
    #[case(ListingStatus::Active, false)]
    #[case(ListingStatus::Inactive, false)]
    #[case(ListingStatus::Sold, true)]
    #[case(ListingStatus::Rented, true)]
    fn terminal_statuses(#[case] status: ListingStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }
}
