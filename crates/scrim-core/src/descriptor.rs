use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::context::AmbientContext;
use crate::host::RenderError;
use crate::props::Props;

/// Runtime-exposed interface of a mounted component instance.
pub type Exposed = Rc<dyn Any>;

/// Component reference an overlay is built from.
pub type ComponentRef = Rc<dyn OverlayComponent>;

/// The host framework's component seam. `instantiate` is called by the render
/// contract on first mount and returns whatever interface the instance
/// exposes to imperative callers, if any.
pub trait OverlayComponent {
    fn type_name(&self) -> &str;

    fn instantiate(&self, props: &Props) -> Result<Option<Exposed>, RenderError>;
}

/// Slot content threaded into a descriptor.
#[derive(Clone)]
pub enum SlotContent {
    Text(String),
    Component(ComponentRef),
}

pub type Slots = HashMap<String, SlotContent>;

/// Immutable-per-version description of a component instance: component ref,
/// current props, slots, and the ambient context it was mounted under.
///
/// Reconfiguration never mutates a descriptor; it produces a clone with
/// overridden props. Clones share the runtime-instance cell, so the mounted
/// instance (and its exposed interface) survives prop patches. A fresh
/// [`Descriptor::new`] gets a new, empty cell.
pub struct Descriptor {
    component: ComponentRef,
    props: Props,
    slots: Slots,
    context: Option<AmbientContext>,
    instance: Rc<RefCell<Option<Instance>>>,
}

/// Live mounted instance. Present while mounted even when the component
/// exposes nothing, so "mounted" and "has an exposed interface" stay
/// distinct.
struct Instance {
    exposed: Option<Exposed>,
}

impl Descriptor {
    pub fn new(component: ComponentRef, props: Props, slots: Slots) -> Rc<Self> {
        Rc::new(Self {
            component,
            props,
            slots,
            context: None,
            instance: Rc::new(RefCell::new(None)),
        })
    }

    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn context(&self) -> Option<&AmbientContext> {
        self.context.as_ref()
    }

    /// New version of this descriptor carrying exactly `props`; shares the
    /// runtime-instance cell.
    pub fn clone_with_props(&self, props: Props) -> Rc<Self> {
        Rc::new(Self {
            component: self.component.clone(),
            props,
            slots: self.slots.clone(),
            context: self.context.clone(),
            instance: self.instance.clone(),
        })
    }

    /// Exposed interface of the mounted instance; absent until first mount
    /// and for components that expose nothing.
    pub fn exposed(&self) -> Option<Exposed> {
        self.instance.borrow().as_ref().and_then(|i| i.exposed.clone())
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.borrow().is_some()
    }

    /// Called by the render contract when the instance is mounted.
    pub fn attach_instance(&self, exposed: Option<Exposed>) {
        *self.instance.borrow_mut() = Some(Instance { exposed });
    }

    /// Called by the render contract when the instance is destroyed.
    pub fn detach_instance(&self) {
        *self.instance.borrow_mut() = None;
    }

    /// Two descriptors are versions of the same mounted instance.
    pub fn same_instance(&self, other: &Descriptor) -> bool {
        Rc::ptr_eq(&self.instance, &other.instance)
    }
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("component", &self.component.type_name())
            .field("props", &self.props)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// New version of `descriptor` carrying the ambient context; used by
/// controllers during init. Shares the runtime-instance cell.
pub fn attach_context(descriptor: &Rc<Descriptor>, ctx: AmbientContext) -> Rc<Descriptor> {
    Rc::new(Descriptor {
        component: descriptor.component.clone(),
        props: descriptor.props.clone(),
        slots: descriptor.slots.clone(),
        context: Some(ctx),
        instance: descriptor.instance.clone(),
    })
}
