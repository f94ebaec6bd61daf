use std::cell::RefCell;
use std::rc::Rc;

use scrim_core::{
    AmbientContext, ContainerNode, Descriptor, Exposed, Props, RenderHost, Signal, ambient_context,
    attach_context, document_root, flush, on_scope_dispose, signal,
};

use crate::config::{ConfigUpdate, OverlayConfig};

/// Owns one overlay instance: container acquisition, lazy or eager
/// initialization, visibility tracking, configuration merging, disposal.
/// Cloning yields another handle to the same instance.
///
/// All operations are defensive no-ops when their preconditions (an existing
/// descriptor, a live container) are unmet; lifecycle callbacks fire
/// unconditionally per transition either way. `update_config` and `remove`
/// take effect at the next flush boundary; `open`, `close`, and `confirm`
/// run synchronously apart from the update they queue.
///
/// A teardown and a configuration update queued into the same flush resolve
/// in FIFO order, but update tasks re-check descriptor existence when they
/// run, so any flush containing a teardown leaves the controller disposed.
#[derive(Clone)]
pub struct OverlayController {
    inner: Rc<Inner>,
}

struct Inner {
    config: OverlayConfig,
    host: Rc<dyn RenderHost>,
    context: Option<AmbientContext>,

    /// Current materialized descriptor; absent before init and after disposal.
    vm: Signal<Option<Rc<Descriptor>>>,
    /// Single source of truth for "meant to be shown".
    visible: Signal<bool>,
    /// Projection of the mounted instance's exposed interface; recomputed
    /// whenever the descriptor reference changes.
    exposed: Signal<Option<Exposed>>,

    /// The detached host node overlays mount into; cleared on disposal.
    container: RefCell<Option<ContainerNode>>,
    /// Parent the host container was appended to, once resolved.
    parent: RefCell<Option<ContainerNode>>,
}

impl OverlayController {
    /// Builds a controller reading the process-wide ambient context at init.
    pub fn new(config: OverlayConfig, host: Rc<dyn RenderHost>) -> Self {
        Self::with_context(config, host, None)
    }

    /// Builds a controller with an explicit context handle, taking precedence
    /// over the process-wide one.
    pub fn with_context(
        config: OverlayConfig,
        host: Rc<dyn RenderHost>,
        context: Option<AmbientContext>,
    ) -> Self {
        let visible = signal(config.visible || config.immediate);
        let vm: Signal<Option<Rc<Descriptor>>> = signal(None);
        let exposed: Signal<Option<Exposed>> = signal(None);

        {
            let exposed = exposed.clone();
            vm.subscribe(move |desc| {
                exposed.set(desc.as_ref().and_then(|d| d.exposed()));
            });
        }

        let controller = Self {
            inner: Rc::new(Inner {
                config,
                host,
                context,
                vm,
                visible,
                exposed,
                container: RefCell::new(Some(ContainerNode::new())),
                parent: RefCell::new(None),
            }),
        };

        if !controller.inner.config.lazy {
            controller.inner.init();
        }

        if controller.inner.config.auto_destroy {
            let handle = controller.clone();
            on_scope_dispose(move || handle.remove());
        }

        controller
    }

    /// Shows the overlay. Destroys and recreates the descriptor unless
    /// `keep_alive`; queues a reset-mode update carrying the initial prop bag
    /// (cell-dereferenced when `auto_deref`) plus `visible: true`; invokes
    /// `on_open` synchronously.
    pub fn open(&self) {
        let inner = &self.inner;

        if inner.vm.get().is_some() && !inner.config.keep_alive {
            inner.destroy_payload();
            inner.vm.set(None);
        }
        if inner.vm.get().is_none() {
            inner.init();
        }

        if inner.vm.get().is_some() {
            let base = if inner.config.auto_deref {
                inner.config.props.deref_cells()
            } else {
                inner.config.props.clone()
            };
            self.schedule_update(base.merged_with(&Props::new().with("visible", true)), true);
        }

        if let Some(cb) = &inner.config.on_open {
            cb();
        }
    }

    /// Queues a merge-mode `visible: false` update and invokes `on_close`.
    pub fn close(&self) {
        self.hide(HideIntent::Close);
    }

    /// Same state effect as `close`, distinct caller intent: `on_confirm`.
    pub fn confirm(&self) {
        self.hide(HideIntent::Confirm);
    }

    /// Tears the overlay down at the next flush boundary: visibility off,
    /// descriptor unmounted, container detached and cleared, `on_remove`
    /// invoked. Idempotent.
    pub fn remove(&self) {
        let inner = self.inner.clone();
        flush::schedule(move || inner.teardown());
    }

    /// Applies a prop patch at the next flush boundary. Silent no-op when no
    /// descriptor exists; callers must not assume an update applied without
    /// checking descriptor existence.
    pub fn update_config(&self, update: ConfigUpdate) {
        self.schedule_update(update.props, update.reset);
    }

    pub fn visible(&self) -> Signal<bool> {
        self.inner.visible.clone()
    }

    pub fn exposed(&self) -> Signal<Option<Exposed>> {
        self.inner.exposed.clone()
    }

    /// Current descriptor reference, if materialized.
    pub fn descriptor(&self) -> Option<Rc<Descriptor>> {
        self.inner.vm.get()
    }

    pub fn descriptor_signal(&self) -> Signal<Option<Rc<Descriptor>>> {
        self.inner.vm.clone()
    }

    /// Diagnostic: the detached host node overlays mount into.
    pub fn host_container(&self) -> Option<ContainerNode> {
        self.inner.container.borrow().clone()
    }

    /// Diagnostic: the parent node the host container was appended to.
    pub fn parent_container(&self) -> Option<ContainerNode> {
        self.inner.parent.borrow().clone()
    }

    fn hide(&self, intent: HideIntent) {
        if self.inner.vm.get().is_some() {
            self.schedule_update(Props::new().with("visible", false), false);
        }

        let cb = match intent {
            HideIntent::Close => &self.inner.config.on_close,
            HideIntent::Confirm => &self.inner.config.on_confirm,
        };
        if let Some(cb) = cb {
            cb();
        }
    }

    fn schedule_update(&self, patch: Props, reset: bool) {
        if self.inner.vm.get().is_none() {
            log::debug!("update_config without a descriptor ignored");
            return;
        }
        let inner = self.inner.clone();
        flush::schedule(move || inner.apply_update(patch, reset));
    }
}

enum HideIntent {
    Close,
    Confirm,
}

impl Inner {
    /// Materializes the descriptor and mounts it: initial props plus the
    /// current visibility value, ambient context attached when configured,
    /// host container appended to the resolved parent. No-op once disposed.
    fn init(&self) {
        let Some(container) = self.container.borrow().clone() else {
            log::warn!("init on a disposed overlay ignored");
            return;
        };

        let props = Props::new()
            .with("visible", self.visible.get())
            .merged_with(&self.config.props);
        let mut desc = self
            .host
            .create(self.config.component.clone(), props, self.config.slots.clone());

        if let Some(ctx) = self.context.clone().or_else(ambient_context) {
            desc = attach_context(&desc, ctx);
        }

        if let Err(e) = self.host.mount(Some(&desc), &container) {
            log::error!("overlay mount failed: {e}");
            return;
        }

        let parent = match &self.config.resolve_container {
            Some(resolve) => resolve(),
            None => document_root(),
        };
        parent.append_child(&container);
        *self.parent.borrow_mut() = Some(parent);

        self.vm.set(Some(desc));
    }

    /// Runs at the flush boundary. Re-checks preconditions: a teardown may
    /// have resolved between scheduling and now.
    fn apply_update(&self, patch: Props, reset: bool) {
        let Some(desc) = self.vm.get() else {
            return;
        };
        let Some(container) = self.container.borrow().clone() else {
            return;
        };

        if let Some(v) = patch.get("visible").and_then(|v| v.as_bool()) {
            self.visible.set(v);
        }

        let next_props = if reset {
            patch
        } else {
            desc.props().merged_with(&patch)
        };
        let next = self.host.clone_with_overrides(&desc, next_props);

        if let Err(e) = self.host.mount(Some(&next), &container) {
            log::error!("overlay remount failed: {e}");
            return;
        }
        self.vm.set(Some(next));
    }

    fn teardown(&self) {
        self.visible.set(false);
        self.destroy_payload();
        *self.container.borrow_mut() = None;
        *self.parent.borrow_mut() = None;
        self.vm.set(None);

        if let Some(cb) = &self.config.on_remove {
            cb();
        }
    }

    /// Unmounts whatever the host container holds and detaches it from its
    /// parent. No-op when the container is already gone.
    fn destroy_payload(&self) {
        if let Some(container) = self.container.borrow().clone() {
            if let Err(e) = self.host.unmount(&container) {
                log::error!("overlay unmount failed: {e}");
            }
            container.detach();
        }
    }
}
