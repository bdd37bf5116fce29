//! Bundles and the predefined values they hold.

use crate::{entity, entity_union};

use super::common::User;

entity! {
    pub struct BuildBundleElement: "BuildBundleElement" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity! {
    pub struct VersionBundleElement: "VersionBundleElement" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity! {
    pub struct OwnedBundleElement: "OwnedBundleElement" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity! {
    pub struct EnumBundleElement: "EnumBundleElement" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity! {
    pub struct StateBundleElement: "StateBundleElement" {
        id: Option<String>,
        name: Option<String>,
    }
}

entity_union! {
    /// Any selectable bundle value.
    pub enum BundleElement {
        Build(BuildBundleElement),
        Version(VersionBundleElement),
        Owned(OwnedBundleElement),
        Enum(EnumBundleElement),
        State(StateBundleElement),
    }
}

impl BundleElement {
    pub fn id(&self) -> Option<&str> {
        match self {
            BundleElement::Build(element) => element.id().as_deref(),
            BundleElement::Version(element) => element.id().as_deref(),
            BundleElement::Owned(element) => element.id().as_deref(),
            BundleElement::Enum(element) => element.id().as_deref(),
            BundleElement::State(element) => element.id().as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            BundleElement::Build(element) => element.name().as_deref(),
            BundleElement::Version(element) => element.name().as_deref(),
            BundleElement::Owned(element) => element.name().as_deref(),
            BundleElement::Enum(element) => element.name().as_deref(),
            BundleElement::State(element) => element.name().as_deref(),
        }
    }
}

entity! {
    pub struct EnumBundle: "EnumBundle" {
        id: Option<String>,
        values: Option<Vec<EnumBundleElement>>,
    }
}

entity! {
    pub struct StateBundle: "StateBundle" {
        id: Option<String>,
        values: Option<Vec<StateBundleElement>>,
    }
}

entity! {
    pub struct OwnedBundle: "OwnedBundle" {
        id: Option<String>,
        values: Option<Vec<OwnedBundleElement>>,
    }
}

entity! {
    pub struct VersionBundle: "VersionBundle" {
        id: Option<String>,
        values: Option<Vec<VersionBundleElement>>,
    }
}

entity! {
    pub struct BuildBundle: "BuildBundle" {
        id: Option<String>,
        values: Option<Vec<BuildBundleElement>>,
    }
}

entity! {
    /// Users selectable in a user field, with group members expanded.
    pub struct UserBundle: "UserBundle" {
        id: Option<String>,
        aggregated_users as "aggregatedUsers": Option<Vec<User>>,
    }
}
