//! Helper macro for declaring port error enums.
//!
//! Each variant lists its fields and a `thiserror` display string; the
//! macro derives the error and adds one snake_case constructor per variant
//! whose parameters accept anything convertible into the field type.

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

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
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
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for generated constructors and messages.

    use crate::domain::EntityId;

    define_port_error! {
        pub enum SamplePortError {
            Unavailable => "repository unavailable",
            Missing { id: EntityId } => "entity {id} not found",
            Rejected { id: EntityId, reason: String } => "entity {id} rejected: {reason}",
        }
    }

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).expect("non-zero id")
    }

    #[test]
    fn unit_variants_get_argumentless_constructors() {
        assert_eq!(SamplePortError::unavailable().to_string(), "repository unavailable");
    }

    #[test]
    fn constructors_preserve_field_types() {
        let err = SamplePortError::missing(id(4));
        assert_eq!(err, SamplePortError::Missing { id: id(4) });
        assert_eq!(err.to_string(), "entity 4 not found");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::rejected(id(9), "has orders");
        assert_eq!(err.to_string(), "entity 9 rejected: has orders");
    }
}
