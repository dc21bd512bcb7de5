//! Closed value sets picked from dropdowns in the survey form.
//!
//! # Invariants
//! - Every variant has exactly one wire value, shared by serde, field updates
//!   and the submission payload.

/// A closed set of selectable values with stable wire strings.
pub trait Choice: Copy + Eq + Sized + 'static {
    /// Every variant in display order.
    const ALL: &'static [Self];

    /// Stable wire value.
    fn as_str(self) -> &'static str;

    /// Parses a wire value. Surrounding whitespace is ignored, case is not.
    fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.as_str() == normalized)
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $crate::model::choice::Choice for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::model::choice::Choice::as_str(*self))
            }
        }
    };
}

pub(crate) use choice_enum;
