//! Declaration macros for entities and discriminated unions.

/// Declare an entity type.
///
/// ```
/// use youtrack_sdk::entity;
/// use youtrack_sdk::model::{Entity, Project};
///
/// entity! {
///     /// A narrow issue projection.
///     pub struct IssueSummary: "Issue" {
///         id_readable as "idReadable": Option<String>,
///         summary: Option<String>,
///         project: Option<Project>,
///     }
/// }
///
/// let issue = IssueSummary::new().with_summary(Some("Broken build".into()));
/// assert_eq!(issue.summary().as_deref(), Some("Broken build"));
/// assert_eq!(issue.type_tag(), Some("Issue"));
/// ```
///
/// The optional `: "Tag" | "Alias"` list declares the accepted `$type` values,
/// default first; without it the entity is untagged. Fields default to unset.
/// Fields in a trailing `required { .. }` block become arguments of `new`.
///
/// Each field gets a `&T` getter and a consuming `with_<field>` setter that
/// marks the field as explicitly supplied.
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $($tag:literal)|+)? {
            $(
                $(#[$fmeta:meta])*
                $field:ident $(as $alias:literal)?: $ty:ty
            ),* $(,)?
        }
        $(
            required {
                $(
                    $(#[$rmeta:meta])*
                    $rfield:ident $(as $ralias:literal)?: $rty:ty
                ),* $(,)?
            }
        )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            type_tag: ::core::option::Option<&'static str>,
            $( $field: $ty, )*
            $($( $rfield: $rty, )*)?
            fields_set: $crate::model::FieldSet,
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    type_tag: <Self as $crate::model::Entity>::TAGS.first().copied(),
                    $( $field: ::core::default::Default::default(), )*
                    $($( $rfield: ::core::default::Default::default(), )*)?
                    fields_set: $crate::model::FieldSet::default(),
                }
            }
        }

        #[allow(dead_code)]
        impl $name {
            /// Create an instance with only the required fields supplied.
            pub fn new($($( $rfield: $rty ),*)?) -> Self {
                #[allow(unused_mut)]
                let mut entity = Self::default();
                $($(
                    entity.$rfield = $rfield;
                    entity.fields_set.insert(stringify!($rfield));
                )*)?
                entity
            }

            $(
                $(#[$fmeta])*
                pub fn $field(&self) -> &$ty {
                    &self.$field
                }
            )*

            $($(
                $(#[$rmeta])*
                pub fn $rfield(&self) -> &$rty {
                    &self.$rfield
                }
            )*)?

            $crate::__private::paste::paste! {
                $(
                    #[must_use]
                    pub fn [<with_ $field>](mut self, value: $ty) -> Self {
                        self.$field = value;
                        self.fields_set.insert(stringify!($field));
                        self
                    }
                )*

                $($(
                    #[must_use]
                    pub fn [<with_ $rfield>](mut self, value: $rty) -> Self {
                        self.$rfield = value;
                        self.fields_set.insert(stringify!($rfield));
                        self
                    }
                )*)?
            }
        }

        impl ::core::cmp::PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.type_tag == other.type_tag
                    $( && self.$field == other.$field )*
                    $($( && self.$rfield == other.$rfield )*)?
            }
        }

        impl $crate::schema::Schema for $name {
            fn type_descriptor() -> $crate::schema::TypeDescriptor {
                $crate::schema::TypeDescriptor::Entity(
                    <Self as $crate::model::Entity>::descriptor(),
                )
            }
        }

        impl $crate::codec::WireField for $name {
            fn to_wire(&self, view: $crate::codec::View) -> $crate::codec::WireValue {
                $crate::codec::WireValue::Map(<Self as $crate::model::Entity>::wire_view(self, view))
            }

            fn from_wire(
                value: &$crate::__private::serde_json::Value,
                key: &str,
            ) -> ::core::result::Result<Self, $crate::codec::DecodeError> {
                let map = $crate::model::__macro_support::expect_object(value, key)?;
                <Self as $crate::model::Entity>::decode_map(map)
            }
        }

        impl $crate::model::Entity for $name {
            const TAGS: &'static [&'static str] = &[$($($tag),+)?];

            fn descriptor() -> &'static $crate::schema::EntityDescriptor {
                static DESCRIPTOR: $crate::schema::EntityDescriptor = $crate::schema::EntityDescriptor {
                    name: stringify!($name),
                    tags: &[$($($tag),+)?],
                    fields: &[
                        $(
                            $crate::schema::FieldDescriptor {
                                name: stringify!($field),
                                alias: $crate::__entity_alias!($($alias)?),
                                ty: <$ty as $crate::schema::Schema>::type_descriptor,
                            },
                        )*
                        $($(
                            $crate::schema::FieldDescriptor {
                                name: stringify!($rfield),
                                alias: $crate::__entity_alias!($($ralias)?),
                                ty: <$rty as $crate::schema::Schema>::type_descriptor,
                            },
                        )*)?
                    ],
                };
                &DESCRIPTOR
            }

            fn type_tag(&self) -> ::core::option::Option<&'static str> {
                self.type_tag
            }

            fn fields_set(&self) -> &$crate::model::FieldSet {
                &self.fields_set
            }

            fn wire_view(&self, view: $crate::codec::View) -> $crate::codec::WireMap {
                use $crate::model::__macro_support::{encode_field, encode_type};

                let mut map = $crate::codec::WireMap::new();
                encode_type(&mut map, &self.fields_set, view, self.type_tag);
                $(
                    encode_field(
                        &mut map,
                        &self.fields_set,
                        view,
                        stringify!($field),
                        $crate::__entity_key!($field $(, $alias)?),
                        &self.$field,
                    );
                )*
                $($(
                    encode_field(
                        &mut map,
                        &self.fields_set,
                        view,
                        stringify!($rfield),
                        $crate::__entity_key!($rfield $(, $ralias)?),
                        &self.$rfield,
                    );
                )*)?
                map
            }

            fn decode_map(
                map: &$crate::__private::serde_json::Map<::std::string::String, $crate::__private::serde_json::Value>,
            ) -> ::core::result::Result<Self, $crate::codec::DecodeError> {
                use $crate::model::__macro_support::{decode_field, decode_tag};

                let mut fields_set = $crate::model::FieldSet::default();
                let type_tag = decode_tag(
                    map,
                    <Self as $crate::model::Entity>::TAGS,
                    stringify!($name),
                    &mut fields_set,
                )?;
                $(
                    let $field: $ty = decode_field(
                        map,
                        stringify!($name),
                        stringify!($field),
                        $crate::__entity_key!($field $(, $alias)?),
                        &mut fields_set,
                    )?;
                )*
                $($(
                    let $rfield: $rty = decode_field(
                        map,
                        stringify!($name),
                        stringify!($rfield),
                        $crate::__entity_key!($rfield $(, $ralias)?),
                        &mut fields_set,
                    )?;
                )*)?

                Ok(Self {
                    type_tag,
                    $( $field, )*
                    $($( $rfield, )*)?
                    fields_set,
                })
            }
        }
    };
}

/// Declare a union of entities selected by their `$type` tag.
///
/// Decoding reads `$type` and dispatches to the variant whose entity declares
/// that tag; a missing or unknown tag is an error.
#[macro_export]
macro_rules! entity_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
        }

        #[allow(dead_code)]
        impl $name {
            /// The discriminator of the wrapped entity.
            pub fn type_tag(&self) -> ::core::option::Option<&'static str> {
                match self {
                    $( Self::$variant(inner) => <$ty as $crate::model::Entity>::type_tag(inner), )+
                }
            }

            /// Presence set of the wrapped entity.
            pub fn fields_set(&self) -> &$crate::model::FieldSet {
                match self {
                    $( Self::$variant(inner) => <$ty as $crate::model::Entity>::fields_set(inner), )+
                }
            }

            /// Merged wire map of the wrapped entity.
            pub fn wire_map(
                &self,
            ) -> ::core::result::Result<$crate::codec::WireMap, $crate::codec::MergeError> {
                match self {
                    $(
                        Self::$variant(inner) => $crate::codec::to_wire_map(::core::option::Option::Some(inner))
                            .map(::core::option::Option::unwrap_or_default),
                    )+
                }
            }
        }

        impl $crate::schema::Schema for $name {
            fn type_descriptor() -> $crate::schema::TypeDescriptor {
                $crate::schema::TypeDescriptor::Discriminated(::std::boxed::Box::new(
                    $crate::schema::TypeDescriptor::Union(::std::vec![
                        $( <$ty as $crate::schema::Schema>::type_descriptor(), )+
                    ]),
                ))
            }
        }

        impl $crate::codec::WireField for $name {
            fn to_wire(&self, view: $crate::codec::View) -> $crate::codec::WireValue {
                match self {
                    $( Self::$variant(inner) => $crate::codec::WireField::to_wire(inner, view), )+
                }
            }

            fn from_wire(
                value: &$crate::__private::serde_json::Value,
                key: &str,
            ) -> ::core::result::Result<Self, $crate::codec::DecodeError> {
                use $crate::model::__macro_support::{expect_object, read_discriminator};

                let map = expect_object(value, key)?;
                let tag = read_discriminator(map, stringify!($name))?;
                $(
                    if <$ty as $crate::model::Entity>::TAGS.iter().any(|known| *known == tag) {
                        return <$ty as $crate::model::Entity>::decode_map(map).map(Self::$variant);
                    }
                )+
                Err($crate::codec::DecodeError::UnknownDiscriminator {
                    tag: tag.to_string(),
                    expected: stringify!($name),
                })
            }
        }

        $(
            impl ::core::convert::From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __entity_alias {
    () => {
        ::core::option::Option::None
    };
    ($alias:literal) => {
        ::core::option::Option::Some($alias)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __entity_key {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $alias:literal) => {
        $alias
    };
}
