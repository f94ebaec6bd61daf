use std::rc::Rc;

use thiserror::Error;

use crate::container::ContainerNode;
use crate::descriptor::{ComponentRef, Descriptor, Slots};
use crate::props::Props;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("component `{0}` failed to instantiate: {1}")]
    Instantiate(String, String),
    #[error("container {0} is not a valid mount target")]
    BadContainer(u64),
}

/// The render contract consumed by overlay controllers. The host UI
/// framework provides the real implementation; [`HeadlessHost`] is the
/// in-tree reference used by tests and the demo.
pub trait RenderHost {
    /// Builds a fresh descriptor for `component`.
    fn create(&self, component: ComponentRef, props: Props, slots: Slots) -> Rc<Descriptor> {
        Descriptor::new(component, props, slots)
    }

    /// Renders `descriptor` into `container`. `None` unmounts whatever the
    /// container holds and destroys its instance.
    fn mount(
        &self,
        descriptor: Option<&Rc<Descriptor>>,
        container: &ContainerNode,
    ) -> Result<(), RenderError>;

    fn unmount(&self, container: &ContainerNode) -> Result<(), RenderError> {
        self.mount(None, container)
    }

    /// New descriptor version carrying exactly `props` in place of the old
    /// prop bag; the mounted instance is kept.
    fn clone_with_overrides(&self, descriptor: &Descriptor, props: Props) -> Rc<Descriptor> {
        descriptor.clone_with_props(props)
    }
}

/// Reference render host with no drawing backend: tracks the mounted
/// descriptor as the container's payload and drives component instantiation.
/// Mounting a later version of an already-mounted instance patches in place;
/// mounting a different instance unmounts the old one first.
#[derive(Default)]
pub struct HeadlessHost;

impl HeadlessHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self)
    }
}

impl RenderHost for HeadlessHost {
    fn mount(
        &self,
        descriptor: Option<&Rc<Descriptor>>,
        container: &ContainerNode,
    ) -> Result<(), RenderError> {
        match descriptor {
            Some(desc) => {
                if let Some(prev) = container.payload()
                    && !prev.same_instance(desc)
                {
                    prev.detach_instance();
                }
                if !desc.is_mounted() {
                    let exposed = desc.component().instantiate(desc.props())?;
                    desc.attach_instance(exposed);
                }
                container.set_payload(Some(desc.clone()));
                log::debug!(
                    "mounted `{}` into container {}",
                    desc.component().type_name(),
                    container.id()
                );
                Ok(())
            }
            None => {
                if let Some(prev) = container.payload() {
                    prev.detach_instance();
                    log::debug!(
                        "unmounted `{}` from container {}",
                        prev.component().type_name(),
                        container.id()
                    );
                }
                container.set_payload(None);
                Ok(())
            }
        }
    }
}
