//! Defines helper macros for generating domain port error enums.
//!
//! Each variant names the [`ErrorCode`](crate::domain::ErrorCode) it maps to,
//! so the generated enum carries a `code()` accessor and converts into
//! [`DomainError`](crate::domain::DomainError) without a hand-written match.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (@pattern $variant:ident) => { Self::$variant };
    (@pattern $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => { Self::$variant { .. } };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $code:ident : $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Error category surfaced to callers of the domain services.
            pub const fn code(&self) -> $crate::domain::ErrorCode {
                match self {
                    $(
                        define_port_error!(@pattern $variant $( { $($field : $ty),* } )?)
                            => $crate::domain::ErrorCode::$code,
                    )*
                }
            }
        }

        impl From<$name> for $crate::domain::DomainError {
            fn from(err: $name) -> Self {
                $crate::domain::DomainError::new(err.code(), err.to_string())
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::{DomainError, ErrorCode};

    define_port_error! {
        pub enum ExamplePortError {
            Offline => Transport: "offline",
            Slow { millis: u64 } => Timeout: "slow: {millis}ms",
            Rejected { status: u16, message: String } => Internal: "rejected {status}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        let err = ExamplePortError::offline();
        assert_eq!(err, ExamplePortError::Offline);
        assert_eq!(err.to_string(), "offline");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExamplePortError::slow(250_u64);
        assert_eq!(err.to_string(), "slow: 250ms");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::rejected(503_u16, "maintenance");
        assert_eq!(err.to_string(), "rejected 503: maintenance");
    }

    #[test]
    fn variants_map_to_declared_codes() {
        assert_eq!(ExamplePortError::offline().code(), ErrorCode::Transport);
        assert_eq!(ExamplePortError::slow(1_u64).code(), ErrorCode::Timeout);
        assert_eq!(
            ExamplePortError::rejected(500_u16, "boom").code(),
            ErrorCode::Internal
        );
    }

    #[test]
    fn conversion_keeps_code_and_message() {
        let err: DomainError = ExamplePortError::slow(10_u64).into();
        assert_eq!(err.code(), ErrorCode::Timeout);
        assert_eq!(err.message(), "slow: 10ms");
    }
}
