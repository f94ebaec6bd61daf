use std::rc::Rc;

use scrim_core::{ComponentRef, ContainerNode, Props, SlotContent, Slots};

pub type Callback = Rc<dyn Fn()>;
pub type ContainerResolver = Rc<dyn Fn() -> ContainerNode>;

/// Caller-supplied overlay configuration, immutable for the life of one
/// controller instance.
///
/// Defaults: `lazy` and `auto_deref` are on, everything else is off. With
/// `lazy` the overlay materializes on the first `open()`; `immediate` forces
/// the visibility cell to true at construction; `keep_alive` reuses the
/// mounted instance across repeated opens instead of destroying and
/// recreating it; `auto_destroy` ties teardown to the enclosing scope.
#[derive(Clone)]
pub struct OverlayConfig {
    pub component: ComponentRef,
    pub props: Props,
    pub slots: Slots,

    pub lazy: bool,
    pub visible: bool,
    pub immediate: bool,
    pub auto_destroy: bool,
    pub keep_alive: bool,
    pub auto_deref: bool,

    pub on_open: Option<Callback>,
    pub on_close: Option<Callback>,
    pub on_confirm: Option<Callback>,
    pub on_remove: Option<Callback>,

    /// Resolves the parent node the host container is appended to.
    /// Defaults to the process-wide document root.
    pub resolve_container: Option<ContainerResolver>,
}

impl OverlayConfig {
    pub fn new(component: ComponentRef) -> Self {
        Self {
            component,
            props: Props::new(),
            slots: Slots::new(),
            lazy: true,
            visible: false,
            immediate: false,
            auto_destroy: false,
            keep_alive: false,
            auto_deref: true,
            on_open: None,
            on_close: None,
            on_confirm: None,
            on_remove: None,
            resolve_container: None,
        }
    }

    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn slot(mut self, name: impl Into<String>, content: SlotContent) -> Self {
        self.slots.insert(name.into(), content);
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn auto_destroy(mut self, auto_destroy: bool) -> Self {
        self.auto_destroy = auto_destroy;
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn auto_deref(mut self, auto_deref: bool) -> Self {
        self.auto_deref = auto_deref;
        self
    }

    pub fn on_open(mut self, f: impl Fn() + 'static) -> Self {
        self.on_open = Some(Rc::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(f));
        self
    }

    pub fn on_confirm(mut self, f: impl Fn() + 'static) -> Self {
        self.on_confirm = Some(Rc::new(f));
        self
    }

    pub fn on_remove(mut self, f: impl Fn() + 'static) -> Self {
        self.on_remove = Some(Rc::new(f));
        self
    }

    pub fn container_in(mut self, resolver: impl Fn() -> ContainerNode + 'static) -> Self {
        self.resolve_container = Some(Rc::new(resolver));
        self
    }
}

/// Argument to `update_config`: a prop patch plus merge/reset mode.
/// Reset replaces the full prop set with the patch; merge unions prior props
/// with the patch, patch winning on conflicts.
#[derive(Clone, Debug)]
pub struct ConfigUpdate {
    pub props: Props,
    pub reset: bool,
}

impl ConfigUpdate {
    pub fn merge(props: Props) -> Self {
        Self {
            props,
            reset: false,
        }
    }

    pub fn reset(props: Props) -> Self {
        Self { props, reset: true }
    }
}
