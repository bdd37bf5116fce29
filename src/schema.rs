//! Static field descriptors.
//!
//! Every entity declared with [`entity!`](crate::entity) owns one static
//! [`EntityDescriptor`]. The descriptor is the single source of truth for the
//! projection engine (which walks it) and the codec (which uses the same
//! wire keys), so the two can never disagree about a field's name.

use chrono::{DateTime, NaiveDate, Utc};

/// Wire key of the discriminator on tagged entities.
pub const TYPE_KEY: &str = "$type";

/// Shape of a value as seen by the projection engine.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// A primitive leaf. The name is only used in error messages.
    Scalar(&'static str),
    /// A nested entity.
    Entity(&'static EntityDescriptor),
    /// A sequence of the inner shape.
    Sequence(Box<TypeDescriptor>),
    /// Any of the member shapes.
    Union(Vec<TypeDescriptor>),
    /// A union selected on the wire by its `$type` tag.
    Discriminated(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Human readable name of the shape, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TypeDescriptor::Scalar(name) => (*name).to_string(),
            TypeDescriptor::Entity(entity) => entity.name.to_string(),
            TypeDescriptor::Sequence(inner) => format!("sequence of {}", inner.describe()),
            TypeDescriptor::Union(members) => members
                .iter()
                .map(TypeDescriptor::describe)
                .collect::<Vec<_>>()
                .join(" | "),
            TypeDescriptor::Discriminated(inner) => inner.describe(),
        }
    }
}

/// Static description of an entity type.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Rust type name.
    pub name: &'static str,
    /// Accepted discriminator values, default first. Empty for untagged entities.
    pub tags: &'static [&'static str],
    /// Fields in declaration order, excluding the discriminator.
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    /// Whether the entity carries a `$type` discriminator.
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Look up a field by its Rust name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// One field of an entity.
#[derive(Debug)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    /// Resolved lazily so that descriptors may refer to each other.
    pub ty: fn() -> TypeDescriptor,
}

impl FieldDescriptor {
    /// The key used on the wire: the alias when declared, the name otherwise.
    pub fn wire_key(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

/// Types that can describe their own wire shape.
pub trait Schema {
    fn type_descriptor() -> TypeDescriptor;
}

macro_rules! scalar_schema {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Schema for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::Scalar($name)
                }
            }
        )+
    };
}

scalar_schema! {
    String => "string",
    i64 => "integer",
    f64 => "float",
    bool => "boolean",
    DateTime<Utc> => "timestamp",
    NaiveDate => "date",
}

impl<T: Schema> Schema for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        T::type_descriptor()
    }
}

impl<T: Schema> Schema for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Sequence(Box::new(T::type_descriptor()))
    }
}

impl<T: Schema> Schema for Box<T> {
    fn type_descriptor() -> TypeDescriptor {
        T::type_descriptor()
    }
}
