use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Stable key returned by [`Signal::subscribe`], used to unsubscribe.
    pub struct SubKey;
}

/// Observable, reactive value. Cloning yields another handle to the same cell.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: SlotMap<SubKey, Rc<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: SlotMap::with_key(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T)
    where
        T: Clone,
    {
        {
            self.0.borrow_mut().value = v;
        }
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        {
            f(&mut self.0.borrow_mut().value);
        }
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubKey {
        self.0.borrow_mut().subs.insert(Rc::new(f))
    }

    pub fn unsubscribe(&self, key: SubKey) {
        self.0.borrow_mut().subs.remove(key);
    }

    /// Two handles observe the same cell.
    pub fn ptr_eq(&self, other: &Signal<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // Subscribers get a snapshot taken after the write and run with no
    // borrow held, so they may read or write this signal re-entrantly.
    fn notify(&self)
    where
        T: Clone,
    {
        let (subs, value) = {
            let inner = self.0.borrow();
            let subs: SmallVec<[Rc<dyn Fn(&T)>; 4]> = inner.subs.values().cloned().collect();
            (subs, inner.value.clone())
        };
        for s in subs {
            s(&value);
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signal").field(&self.0.borrow().value).finish()
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
