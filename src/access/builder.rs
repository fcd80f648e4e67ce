use std::fmt;
use std::hash::Hash;

use tracing::trace;

use super::list::AccessControlList;
use super::resource_list::{Extent, Polarity, ResourceList};

/// Ordered allow/deny rules, evaluated per identity.
///
/// Each rule maps an identity to a set of resources. [`build`](Self::build)
/// runs every rule in registration order and folds the results, so later
/// rules refine earlier ones.
///
/// # Example
///
/// ```rust
/// use warden::access::AccessControlListBuilder;
///
/// struct User {
///     admin: bool,
/// }
///
/// let builder = AccessControlListBuilder::<User, &str>::new()
///     .allow(|_| ["docs", "wiki", "billing"])
///     .deny(|user: &User| if user.admin { vec![] } else { vec!["billing"] });
///
/// let acl = builder.build(&User { admin: false });
/// assert!(acl.has_access(&"docs"));
/// assert!(!acl.has_access(&"billing"));
/// assert!(builder.build(&User { admin: true }).has_access(&"billing"));
/// ```
pub struct AccessControlListBuilder<I: ?Sized, R> {
    rules: Vec<Box<dyn Fn(&I) -> ResourceList<R> + Send + Sync>>,
}

impl<I: ?Sized + 'static, R: Eq + Hash + 'static> AccessControlListBuilder<I, R> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Grants the returned resources.
    pub fn allow<F, It>(self, rule: F) -> Self
    where
        F: Fn(&I) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = R>,
    {
        self.push(Polarity::Allow, Extent::Inclusive, rule)
    }

    /// Withholds the returned resources.
    pub fn deny<F, It>(self, rule: F) -> Self
    where
        F: Fn(&I) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = R>,
    {
        self.push(Polarity::Deny, Extent::Inclusive, rule)
    }

    /// Grants every resource except the returned ones.
    pub fn allow_all_except<F, It>(self, rule: F) -> Self
    where
        F: Fn(&I) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = R>,
    {
        self.push(Polarity::Allow, Extent::Exclusive, rule)
    }

    /// Withholds every resource except the returned ones.
    pub fn deny_all_except<F, It>(self, rule: F) -> Self
    where
        F: Fn(&I) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = R>,
    {
        self.push(Polarity::Deny, Extent::Exclusive, rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates every rule for `identity` and folds the results, starting
    /// from an empty allow list.
    ///
    /// Rules are re-run on every call; nothing is cached between identities.
    pub fn build(&self, identity: &I) -> AccessControlList<R> {
        let list = self
            .rules
            .iter()
            .fold(ResourceList::empty(), |current, rule| current.combine(rule(identity)));

        trace!(
            rules = self.rules.len(),
            polarity = ?list.polarity,
            resources = list.resources.len(),
            "built access control list"
        );

        list.into()
    }

    fn push<F, It>(mut self, polarity: Polarity, extent: Extent, rule: F) -> Self
    where
        F: Fn(&I) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = R>,
    {
        self.rules
            .push(Box::new(move |identity: &I| ResourceList::new(polarity, extent, rule(identity))));
        self
    }
}

impl<I: ?Sized + 'static, R: Eq + Hash + 'static> Default for AccessControlListBuilder<I, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized, R> fmt::Debug for AccessControlListBuilder<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessControlListBuilder")
            .field("rules", &self.rules.len())
            .finish()
    }
}
