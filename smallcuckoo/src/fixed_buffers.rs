use std::{
    io,
    marker::PhantomData,
    ops::{Deref, DerefMut},
};

use bytemuck::Pod;

use crate::byte_store::ByteStore;

/// A typed array over a ByteStore that only accepts types `T` which are Pod (Plain Old Data).
/// The capacity is however many whole `T`s fit in the store.
pub struct FixedVec<T, S: ByteStore> {
    store: S,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T, S> FixedVec<T, S>
where
    T: Pod,
    S: ByteStore,
{
    pub fn new(store: S) -> Self {
        let capacity = store.as_ref().len() / size_of::<T>();
        Self {
            store,
            capacity,
            _marker: PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn flush(&self) -> io::Result<()> {
        self.store.flush()
    }

    fn byte_len(&self) -> usize {
        self.capacity * size_of::<T>()
    }

    fn inner(&self) -> &[T] {
        let end = self.byte_len();
        bytemuck::cast_slice(&self.store.as_ref()[..end])
    }

    fn inner_mut(&mut self) -> &mut [T] {
        let end = self.byte_len();
        bytemuck::cast_slice_mut(&mut self.store.as_mut()[..end])
    }

    /// Doubles the capacity, or makes room for one element when empty.
    /// Existing elements keep their positions.
    pub fn grow(&mut self) -> io::Result<()> {
        let additional = self.capacity.max(1) * size_of::<T>();
        self.store.grow(additional)?;
        self.capacity = self.store.as_ref().len() / size_of::<T>();
        Ok(())
    }
}

impl<T: Pod, S: ByteStore> Deref for FixedVec<T, S> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.inner()
    }
}

impl<T: Pod, S: ByteStore> DerefMut for FixedVec<T, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner_mut()
    }
}
