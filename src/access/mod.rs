//! Access control lists built from ordered allow/deny rules.
//!
//! A rule maps an identity to a set of resources, tagged with a polarity
//! (allow or deny) and an extent (the resources themselves, or everything
//! except them). The builder folds the rules in order into a single
//! [`AccessControlList`] that answers `has_access` for that identity.
//!
//! Folding keeps the list in its smallest form: an allow list of the only
//! reachable resources, or a deny list of the only unreachable ones. An
//! "all except" rule turns the list around, so the resources it names
//! become the whole list.
//!
//! ```rust
//! use warden::access::AccessControlListBuilder;
//!
//! let acl = AccessControlListBuilder::<(), u32>::new()
//!     .allow(|_| [1, 2, 3])
//!     .deny(|_| [2])
//!     .build(&());
//!
//! assert!(acl.has_access(&1));
//! assert!(!acl.has_access(&2));
//! assert!(!acl.has_access(&4));
//! ```

mod builder;
mod list;
mod resource_list;

pub use builder::AccessControlListBuilder;
pub use list::AccessControlList;
pub use resource_list::{Extent, Polarity, ResourceList};
