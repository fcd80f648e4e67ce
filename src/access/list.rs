use std::collections::HashSet;
use std::hash::Hash;

use super::resource_list::{Extent, Polarity, ResourceList};

/// The access decision for one identity.
///
/// With `Allow` polarity the listed resources are the only accessible ones;
/// with `Deny` polarity they are the only inaccessible ones.
#[derive(Clone, Debug)]
pub struct AccessControlList<R> {
    polarity: Polarity,
    resources: HashSet<R>,
}

impl<R: Eq + Hash> AccessControlList<R> {
    pub fn new(polarity: Polarity, resources: HashSet<R>) -> Self {
        Self {
            polarity,
            resources,
        }
    }

    pub fn has_access(&self, resource: &R) -> bool {
        self.resources.contains(resource) != (self.polarity == Polarity::Deny)
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn resources(&self) -> &HashSet<R> {
        &self.resources
    }
}

impl<R: Eq + Hash> PartialEq for AccessControlList<R> {
    fn eq(&self, other: &Self) -> bool {
        self.polarity == other.polarity && self.resources == other.resources
    }
}

impl<R: Eq + Hash> Eq for AccessControlList<R> {}

impl<R: Eq + Hash> From<ResourceList<R>> for AccessControlList<R> {
    fn from(list: ResourceList<R>) -> Self {
        let polarity = match list.extent {
            Extent::Inclusive => list.polarity,
            Extent::Exclusive => list.polarity.flip(),
        };
        Self::new(polarity, list.resources)
    }
}
