//! Macros to reduce boilerplate in the codebase

/// Generate Display and case-insensitive FromStr implementations for
/// wire-level enums whose canonical form is upper-case.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::DeskwatchError;
///
/// enum_display_fromstr!(
///     MyEnum,
///     DeskwatchError::InvalidStatus,
///     {
///         Variant1 => "VARIANT_1",
///         Variant2 => "VARIANT_2",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::DeskwatchError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_variant(s.to_string())),
                }
            }
        }
    };
}
