use std::{cell::{Ref, RefCell, RefMut}, rc::Rc};

/// Shared, interior-mutable handle. Cloning it is a shallow copy.
#[derive(Debug, Default)]
pub struct RcCell<T> {
	inner: Rc<RefCell<T>>,
}

impl<T> Clone for RcCell<T> {
	fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<T> RcCell<T> {
	pub fn new(value: T) -> Self { Self { inner: Rc::new(RefCell::new(value)) } }

	pub fn borrow(&self) -> Ref<'_, T> { self.inner.borrow() }

	pub fn borrow_mut(&self) -> RefMut<'_, T> { self.inner.borrow_mut() }

	/// Whether both handles point at the same allocation.
	pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.inner, &other.inner) }
}

impl<T> From<T> for RcCell<T> {
	fn from(value: T) -> Self { Self::new(value) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_shared_mutation() {
		let a = RcCell::new(1);
		let b = a.clone();
		*b.borrow_mut() = 2;
		assert_eq!(*a.borrow(), 2);
		assert!(a.ptr_eq(&b));
		assert!(!a.ptr_eq(&RcCell::from(2)));
	}
}
