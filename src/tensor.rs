//! Trainable parameter tensor
//!
//! A flat f32 buffer with an optional gradient. Clones share storage so a
//! parameter handed to an optimizer and a parameter held by a model observe
//! the same updates.

use ndarray::Array1;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

struct Storage {
    data: Array1<f32>,
    grad: Option<Array1<f32>>,
    requires_grad: bool,
}

/// Shared trainable parameter
#[derive(Clone)]
pub struct Tensor {
    inner: Rc<RefCell<Storage>>,
}

impl Tensor {
    /// Create a tensor from a vec of values
    pub fn from_vec(data: Vec<f32>, requires_grad: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Storage {
                data: Array1::from_vec(data),
                grad: None,
                requires_grad,
            })),
        }
    }

    /// Snapshot of the current values
    pub fn data(&self) -> Array1<f32> {
        self.inner.borrow().data.clone()
    }

    /// Mutable access to the underlying values
    pub fn data_mut(&self) -> RefMut<'_, Array1<f32>> {
        RefMut::map(self.inner.borrow_mut(), |s| &mut s.data)
    }

    /// Current gradient, if one has been set
    pub fn grad(&self) -> Option<Array1<f32>> {
        self.inner.borrow().grad.clone()
    }

    /// Set the gradient
    pub fn set_grad(&self, grad: Array1<f32>) {
        self.inner.borrow_mut().grad = Some(grad);
    }

    /// Clear the gradient
    pub fn zero_grad(&self) {
        self.inner.borrow_mut().grad = None;
    }

    pub fn requires_grad(&self) -> bool {
        self.inner.borrow().requires_grad
    }

    pub fn set_requires_grad(&self, requires_grad: bool) {
        self.inner.borrow_mut().requires_grad = requires_grad;
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.inner.borrow().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
