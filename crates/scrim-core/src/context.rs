//! Ambient application context.
//!
//! Dynamically created overlays are not part of any declarative tree, so
//! dependencies that statically declared instances resolve through their
//! parents have to be threaded in by hand. The host application installs its
//! context handle once at bootstrap with [`set_ambient_context`]; every
//! controller reads it at initialization time and attaches it to the
//! descriptors it creates. Controllers may also carry an explicit handle,
//! which takes precedence over the process-wide one.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Opaque context handle attached to render descriptors.
#[derive(Clone)]
pub struct AmbientContext(Rc<dyn Any>);

impl AmbientContext {
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub fn ptr_eq(&self, other: &AmbientContext) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for AmbientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AmbientContext")
    }
}

thread_local! {
    static CONTEXT: RefCell<Option<AmbientContext>> = const { RefCell::new(None) };
}

/// Installs the process-wide context. Called once during host bootstrap;
/// calling again replaces the handle for controllers initialized afterwards.
pub fn set_ambient_context(ctx: AmbientContext) {
    CONTEXT.with(|c| {
        if c.borrow().is_some() {
            log::warn!("ambient context replaced after bootstrap");
        }
        *c.borrow_mut() = Some(ctx);
    });
}

/// Current process-wide context, if one was installed.
pub fn ambient_context() -> Option<AmbientContext> {
    CONTEXT.with(|c| c.borrow().clone())
}
