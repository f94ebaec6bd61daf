use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::descriptor::Descriptor;

thread_local! {
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
    static DOCUMENT_ROOT: RefCell<Option<ContainerNode>> = const { RefCell::new(None) };
}

/// Opaque host node that overlays are mounted into. Starts detached; attached
/// to at most one parent at a time. Cloning yields another handle to the same
/// node.
#[derive(Clone)]
pub struct ContainerNode {
    inner: Rc<NodeInner>,
}

struct NodeInner {
    id: u64,
    parent: RefCell<Option<Weak<NodeInner>>>,
    children: RefCell<SmallVec<[ContainerNode; 4]>>,
    payload: RefCell<Option<Rc<Descriptor>>>,
}

impl ContainerNode {
    /// Allocates a fresh, detached node.
    pub fn new() -> Self {
        let id = NEXT_ID.with(|n| {
            let id = n.get();
            n.set(id + 1);
            id
        });
        Self {
            inner: Rc::new(NodeInner {
                id,
                parent: RefCell::new(None),
                children: RefCell::new(SmallVec::new()),
                payload: RefCell::new(None),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn ptr_eq(&self, other: &ContainerNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Appends `child`, reparenting it if it is attached elsewhere.
    pub fn append_child(&self, child: &ContainerNode) {
        child.detach();
        *child.inner.parent.borrow_mut() = Some(Rc::downgrade(&self.inner));
        self.inner.children.borrow_mut().push(child.clone());
    }

    /// Removes this node from its parent, if any.
    pub fn detach(&self) {
        let parent = self.inner.parent.borrow_mut().take();
        if let Some(parent) = parent.and_then(|w| w.upgrade()) {
            parent
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(&c.inner, &self.inner));
        }
    }

    pub fn parent(&self) -> Option<ContainerNode> {
        self.inner
            .parent
            .borrow()
            .as_ref()
            .and_then(|w| w.upgrade())
            .map(|inner| ContainerNode { inner })
    }

    pub fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Descriptor currently rendered into this node, if any.
    pub fn payload(&self) -> Option<Rc<Descriptor>> {
        self.inner.payload.borrow().clone()
    }

    pub fn set_payload(&self, payload: Option<Rc<Descriptor>>) {
        *self.inner.payload.borrow_mut() = payload;
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerNode")
            .field("id", &self.inner.id)
            .field("attached", &self.is_attached())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Process-wide root node, the default mount parent (the "document body"
/// of a headless host). One per thread, created on first use.
pub fn document_root() -> ContainerNode {
    DOCUMENT_ROOT.with(|root| {
        root.borrow_mut()
            .get_or_insert_with(ContainerNode::new)
            .clone()
    })
}
