//! Zero-on-release buffers.
//!
//! [`ZeroedBuffer`] is the storage type behind every piece of sensitive
//! material in the crate: passwords, secrets, keys, digests and the Argon2
//! working memory. Its contents are overwritten with the element type's zero
//! value when the buffer is released, either explicitly through
//! [`ZeroedBuffer::release`] or implicitly when it is dropped.
//!
//! Zeroing goes through [`zeroize::Zeroize`], which uses volatile writes so
//! the compiler cannot elide the wipe of a buffer that is about to be freed.

use std::collections::TryReserveError;
use std::ops::{Deref, DerefMut};

use zeroize::Zeroize;

/// A fixed-size heap buffer that wipes its contents on release.
///
/// The length is fixed at construction. Releasing keeps the allocation (and
/// therefore the length) alive until drop, so reading a released buffer
/// yields zero values rather than stale data.
pub struct ZeroedBuffer<T: Zeroize> {
    data: Vec<T>,
    released: bool,
}

impl<T: Zeroize + Default> ZeroedBuffer<T> {
    /// Allocates `len` default-initialised elements.
    ///
    /// # Panics
    /// Aborts like any other `Vec` allocation if memory is exhausted. Use
    /// [`ZeroedBuffer::try_new`] where allocation failure must be reported.
    pub fn new(len: usize) -> Self {
        let mut data = Vec::with_capacity(len);
        data.resize_with(len, T::default);

        Self {
            data,
            released: false,
        }
    }

    /// Allocates `len` default-initialised elements, reporting allocation
    /// failure instead of aborting.
    pub fn try_new(len: usize) -> Result<Self, TryReserveError> {
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize_with(len, T::default);

        Ok(Self {
            data,
            released: false,
        })
    }
}

impl<T: Zeroize + Clone> ZeroedBuffer<T> {
    /// Copies `values` into a new buffer.
    pub fn from_slice(values: &[T]) -> Self {
        Self {
            data: values.to_vec(),
            released: false,
        }
    }
}

impl<T: Zeroize> ZeroedBuffer<T> {
    /// Overwrites every element with its zero value.
    ///
    /// Safe to call more than once; every call wipes again, including
    /// anything written through `DerefMut` since the previous release.
    pub fn release(&mut self) {
        self.data.iter_mut().for_each(Zeroize::zeroize);
        self.released = true;
    }

    /// Whether [`ZeroedBuffer::release`] has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Zeroize> Drop for ZeroedBuffer<T> {
    fn drop(&mut self) {
        self.data.iter_mut().for_each(Zeroize::zeroize);
    }
}

impl<T: Zeroize + Clone> Clone for ZeroedBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            released: self.released,
        }
    }
}

impl<T: Zeroize> Deref for ZeroedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Zeroize> DerefMut for ZeroedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Zeroize> AsRef<[T]> for ZeroedBuffer<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Zeroize> core::fmt::Debug for ZeroedBuffer<T> {
    // Contents are never printed.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ZeroedBuffer")
            .field("len", &self.data.len())
            .field("released", &self.released)
            .finish()
    }
}
