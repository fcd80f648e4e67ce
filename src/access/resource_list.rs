use std::collections::HashSet;
use std::hash::Hash;

/// Whether a resource list grants or withholds access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Polarity {
    Allow,
    Deny,
}

impl Polarity {
    pub fn flip(self) -> Self {
        match self {
            Polarity::Allow => Polarity::Deny,
            Polarity::Deny => Polarity::Allow,
        }
    }
}

/// Whether a resource list covers its resources or everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Extent {
    /// The list applies to exactly its resources.
    Inclusive,
    /// The list applies to every resource except its own.
    Exclusive,
}

/// One rule's outcome for one identity.
///
/// An exclusive list is equivalent to the inclusive list with the opposite
/// polarity: "allow all except R" withholds access to exactly R.
#[derive(Clone, Debug)]
pub struct ResourceList<R> {
    pub polarity: Polarity,
    pub extent: Extent,
    pub resources: HashSet<R>,
}

impl<R: Eq + Hash> ResourceList<R> {
    pub fn new(polarity: Polarity, extent: Extent, resources: impl IntoIterator<Item = R>) -> Self {
        Self {
            polarity,
            extent,
            resources: resources.into_iter().collect(),
        }
    }

    /// The starting point of every fold: allow nothing.
    pub fn empty() -> Self {
        Self::new(Polarity::Allow, Extent::Inclusive, [])
    }

    /// Polarity of the equivalent inclusive list.
    pub fn effective_polarity(&self) -> Polarity {
        match self.extent {
            Extent::Inclusive => self.polarity,
            Extent::Exclusive => self.polarity.flip(),
        }
    }

    /// Applies `next` on top of `self` and returns an inclusive list with
    /// the combined meaning.
    ///
    /// `self` is first read as inclusive (flipping its polarity when it is
    /// exclusive), then:
    ///
    /// | polarities | `next` extent | resources | polarity |
    /// |------------|---------------|-----------|----------|
    /// | same | inclusive | `self ∪ next` | kept |
    /// | same | exclusive | `next − self` | flipped |
    /// | differ | inclusive | `self − next` | kept |
    /// | differ | exclusive | `self ∩ next` | kept |
    pub fn combine(self, next: ResourceList<R>) -> Self {
        let polarity = self.effective_polarity();
        let mut current = self.resources;
        let mut next_resources = next.resources;

        let (polarity, resources) = match (polarity == next.polarity, next.extent) {
            (true, Extent::Inclusive) => {
                current.extend(next_resources);
                (polarity, current)
            }
            (true, Extent::Exclusive) => {
                next_resources.retain(|r| !current.contains(r));
                (polarity.flip(), next_resources)
            }
            (false, Extent::Inclusive) => {
                current.retain(|r| !next_resources.contains(r));
                (polarity, current)
            }
            (false, Extent::Exclusive) => {
                current.retain(|r| next_resources.contains(r));
                (polarity, current)
            }
        };

        Self {
            polarity,
            extent: Extent::Inclusive,
            resources,
        }
    }
}

impl<R: Eq + Hash> PartialEq for ResourceList<R> {
    fn eq(&self, other: &Self) -> bool {
        self.polarity == other.polarity && self.extent == other.extent && self.resources == other.resources
    }
}

impl<R: Eq + Hash> Eq for ResourceList<R> {}
