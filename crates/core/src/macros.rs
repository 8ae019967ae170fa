// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared across the workspace.

/// `Display` for a fieldless enum, one string per variant.
///
/// ```ignore
/// crate::simple_display! {
///     JobStatus {
///         Starting => "starting",
///         Running => "running",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant => $str, )+
                })
            }
        }
    };
}

/// Test-only builder for a plain struct, plus `Target::builder()`.
///
/// Every field of the target must be listed in exactly one group:
/// `into` fields take `impl Into<T>`, `set` fields take `T`, and `option`
/// fields are `Option<T>` on the target with a setter that wraps in `Some`.
/// Nothing is generated outside `cfg(any(test, feature = "test-support"))`.
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            into { $( $into_field:ident : $into_ty:ty = $into_default:expr ),* $(,)? }
            set { $( $set_field:ident : $set_ty:ty = $set_default:expr ),* $(,)? }
            option { $( $opt_field:ident : $opt_ty:ty = $opt_default:expr ),* $(,)? }
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $( $into_field: $into_ty, )*
            $( $set_field: $set_ty, )*
            $( $opt_field: Option<$opt_ty>, )*
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $( $into_field: $into_default.into(), )*
                    $( $set_field: $set_default, )*
                    $( $opt_field: $opt_default, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $into_field(mut self, v: impl Into<$into_ty>) -> Self {
                    self.$into_field = v.into();
                    self
                }
            )*
            $(
                pub fn $set_field(mut self, v: $set_ty) -> Self {
                    self.$set_field = v;
                    self
                }
            )*
            $(
                pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                    self.$opt_field = Some(v.into());
                    self
                }
            )*

            pub fn build(self) -> $target {
                $target {
                    $( $into_field: self.$into_field, )*
                    $( $set_field: self.$set_field, )*
                    $( $opt_field: self.$opt_field, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            /// Builder seeded with test defaults.
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// By-value setters for config structs, used inside an `impl` block.
///
/// ```ignore
/// impl SupervisorConfig {
///     mb_core::setters! {
///         set { deadline_buffer: Duration }
///     }
/// }
/// ```
#[macro_export]
macro_rules! setters {
    (set { $( $field:ident : $ty:ty ),* $(,)? }) => {
        $(
            pub fn $field(mut self, v: $ty) -> Self {
                self.$field = v;
                self
            }
        )*
    };
}
