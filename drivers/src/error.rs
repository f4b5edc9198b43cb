/*++

Licensed under the Apache-2.0 license.

File Name:

    error.rs

Abstract:

    File contains API and macros used by the library for error handling

--*/

/// Quartz Component
pub enum QuartzComponent {
    /// Battery-backed key register bank
    Bpk = 1,

    /// Tamper sensor front-end
    Sensor = 2,

    /// Tamper response pipeline
    Tamper = 3,
}

#[macro_export]
macro_rules! quartz_err_def {
    ($comp_name:ident, $enum_name: ident { $($field_name: ident = $field_val: literal,)* }) => {

        #[derive(Debug, Copy, Clone, Eq, PartialEq)]
        #[allow(clippy::enum_variant_names)]
        pub enum $enum_name {
            $($field_name = $field_val,)*
        }

        impl From<$enum_name> for core::num::NonZeroU32 {
            fn from(val: $enum_name) -> Self {
                // Panic is impossible as long as the enums don't define zero.
                core::num::NonZeroU32::new(((($crate::QuartzComponent::$comp_name) as u32) << 16) | (val as u32)).unwrap()
            }
        }

        impl From<$enum_name> for u32 {
            fn from(val: $enum_name) -> u32 {
                core::num::NonZeroU32::from(val).into()
            }
        }

        #[allow(unused_macros)]
        macro_rules! raise_err { ($comp_err: ident) => {
            Err(core::num::NonZeroU32::from($enum_name::$comp_err))?
        } }

        #[allow(unused_macros)]
        macro_rules! err { ($comp_err: ident) => {
            Err(u32::from($enum_name::$comp_err))
        } }
    };
}
