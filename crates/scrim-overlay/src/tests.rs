#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use scrim_core::{
        AmbientContext, ContainerNode, Exposed, HeadlessHost, OverlayComponent, PropValue, Props,
        RenderError, Scope, Slots, flush, set_ambient_context, signal,
    };

    use crate::config::{ConfigUpdate, OverlayConfig};
    use crate::controller::OverlayController;

    struct Dialog;

    impl OverlayComponent for Dialog {
        fn type_name(&self) -> &str {
            "Dialog"
        }
        fn instantiate(&self, _props: &Props) -> Result<Option<Exposed>, RenderError> {
            Ok(Some(Rc::new("dialog-api")))
        }
    }

    fn dialog_config() -> OverlayConfig {
        OverlayConfig::new(Rc::new(Dialog))
    }

    #[test]
    fn lazy_defers_descriptor_until_open() {
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        assert!(overlay.descriptor().is_none());
        assert!(overlay.exposed().get().is_none());

        overlay.open();
        assert!(overlay.descriptor().is_some());
    }

    #[test]
    fn eager_init_materializes_at_construction() {
        let overlay = OverlayController::new(dialog_config().lazy(false), HeadlessHost::new());
        assert!(overlay.descriptor().is_some());
        assert!(!overlay.visible().get());
        assert!(overlay.host_container().unwrap().is_attached());
    }

    #[test]
    fn open_sets_visible_after_flush() {
        let overlay = OverlayController::new(
            dialog_config().props(Props::new().with("title", "hello")),
            HeadlessHost::new(),
        );

        overlay.open();
        assert!(!overlay.visible().get()); // not yet, boundary pending
        flush::flush();

        assert!(overlay.visible().get());
        let desc = overlay.descriptor().unwrap();
        assert_eq!(desc.props().get("visible").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(
            desc.props().get("title").and_then(|v| v.as_str()).as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn close_and_confirm_hide_after_flush() {
        for confirm in [false, true] {
            let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
            overlay.open();
            flush::flush();
            assert!(overlay.visible().get());

            if confirm {
                overlay.confirm();
            } else {
                overlay.close();
            }
            flush::flush();

            assert!(!overlay.visible().get());
            // Hidden, not destroyed: the descriptor stays mounted.
            assert!(overlay.descriptor().unwrap().is_mounted());
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        overlay.open();
        flush::flush();

        overlay.remove();
        flush::flush();
        assert!(overlay.host_container().is_none());
        assert!(overlay.descriptor().is_none());
        assert!(overlay.exposed().get().is_none());

        overlay.remove();
        flush::flush();
        assert!(overlay.host_container().is_none());
    }

    #[test]
    fn merge_keeps_unnamed_props_reset_discards_them() {
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        overlay.open();
        flush::flush();

        overlay.update_config(ConfigUpdate::reset(
            Props::new().with("a", 1i64).with("b", 2i64),
        ));
        flush::flush();

        overlay.update_config(ConfigUpdate::merge(Props::new().with("b", 3i64)));
        flush::flush();
        let props = overlay.descriptor().unwrap().props().clone();
        assert_eq!(props.get("a").and_then(|v| v.as_int()), Some(1));
        assert_eq!(props.get("b").and_then(|v| v.as_int()), Some(3));

        overlay.update_config(ConfigUpdate::reset(Props::new().with("b", 3i64)));
        flush::flush();
        let props = overlay.descriptor().unwrap().props().clone();
        assert!(!props.contains("a"));
        assert_eq!(props.get("b").and_then(|v| v.as_int()), Some(3));
    }

    #[test]
    fn update_without_descriptor_is_silent_noop() {
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        overlay.update_config(ConfigUpdate::merge(Props::new().with("a", 1i64)));
        assert_eq!(flush::flush(), 0);
        assert!(overlay.descriptor().is_none());
    }

    #[test]
    fn keep_alive_reuses_descriptor_across_opens() {
        let overlay =
            OverlayController::new(dialog_config().keep_alive(true), HeadlessHost::new());
        overlay.open();
        flush::flush();
        let first = overlay.descriptor().unwrap();
        let first_exposed = overlay.exposed().get().unwrap();

        overlay.open();
        // Reused immediately: same descriptor reference, no re-init.
        assert!(Rc::ptr_eq(&first, &overlay.descriptor().unwrap()));
        flush::flush();

        // The deferred patch clones the descriptor but keeps the instance.
        let second = overlay.descriptor().unwrap();
        assert!(second.same_instance(&first));
        assert!(Rc::ptr_eq(&first_exposed, &overlay.exposed().get().unwrap()));
    }

    #[test]
    fn without_keep_alive_open_recreates_descriptor() {
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        overlay.open();
        flush::flush();
        let first = overlay.descriptor().unwrap();

        overlay.open();
        let second = overlay.descriptor().unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert!(!second.same_instance(&first));
        flush::flush();
        assert!(overlay.visible().get());
    }

    #[test]
    fn auto_destroy_removes_on_scope_disposal() {
        let removed = Rc::new(RefCell::new(0));
        let removed2 = removed.clone();

        let scope = Scope::new();
        let overlay = scope.run(|| {
            OverlayController::new(
                dialog_config()
                    .lazy(false)
                    .auto_destroy(true)
                    .on_remove(move || *removed2.borrow_mut() += 1),
                HeadlessHost::new(),
            )
        });
        assert!(overlay.descriptor().is_some());

        scope.dispose();
        flush::flush();

        assert_eq!(*removed.borrow(), 1);
        assert!(overlay.descriptor().is_none());
        assert!(overlay.host_container().is_none());
    }

    #[test]
    fn exposed_tracks_mount_lifecycle() {
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        assert!(overlay.exposed().get().is_none());

        overlay.open();
        let exposed = overlay.exposed().get().unwrap();
        assert_eq!(exposed.downcast_ref::<&str>(), Some(&"dialog-api"));

        overlay.remove();
        flush::flush();
        assert!(overlay.exposed().get().is_none());
    }

    #[test]
    fn ambient_context_attached_at_init() {
        // Contexts are thread-local, so this test owns its own slot.
        let overlay = OverlayController::new(dialog_config().lazy(false), HeadlessHost::new());
        assert!(overlay.descriptor().unwrap().context().is_none());

        let ctx = AmbientContext::new("app-services".to_string());
        set_ambient_context(ctx.clone());

        let overlay = OverlayController::new(dialog_config().lazy(false), HeadlessHost::new());
        let attached = overlay.descriptor().unwrap().context().cloned().unwrap();
        assert!(attached.ptr_eq(&ctx));
        assert_eq!(
            attached.downcast_ref::<String>().map(String::as_str),
            Some("app-services")
        );

        // Lazy controllers attach at first open, not at construction.
        let lazy = OverlayController::new(dialog_config(), HeadlessHost::new());
        lazy.open();
        assert!(lazy.descriptor().unwrap().context().unwrap().ptr_eq(&ctx));
    }

    #[test]
    fn explicit_context_wins_over_process_wide() {
        set_ambient_context(AmbientContext::new("process-wide".to_string()));

        let explicit = AmbientContext::new("per-controller".to_string());
        let overlay = OverlayController::with_context(
            dialog_config().lazy(false),
            HeadlessHost::new(),
            Some(explicit.clone()),
        );

        let attached = overlay.descriptor().unwrap().context().cloned().unwrap();
        assert!(attached.ptr_eq(&explicit));
        assert_eq!(
            attached.downcast_ref::<String>().map(String::as_str),
            Some("per-controller")
        );
    }

    struct PlainPanel;

    impl OverlayComponent for PlainPanel {
        fn type_name(&self) -> &str {
            "PlainPanel"
        }
        fn instantiate(&self, _props: &Props) -> Result<Option<Exposed>, RenderError> {
            Ok(None)
        }
    }

    #[test]
    fn exposed_stays_absent_for_non_exposing_component() {
        let overlay = OverlayController::new(
            OverlayConfig::new(Rc::new(PlainPanel)),
            HeadlessHost::new(),
        );
        overlay.open();
        flush::flush();

        assert!(overlay.descriptor().unwrap().is_mounted());
        assert!(overlay.exposed().get().is_none());
        assert!(overlay.visible().get());
    }

    #[test]
    fn callbacks_fire_even_when_state_already_matches() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());

        let overlay = OverlayController::new(
            dialog_config()
                .on_open(move || l1.borrow_mut().push("open"))
                .on_close(move || l2.borrow_mut().push("close"))
                .on_confirm(move || l3.borrow_mut().push("confirm"))
                .on_remove(move || l4.borrow_mut().push("remove")),
            HeadlessHost::new(),
        );

        // Closing before anything is mounted skips the patch, not the callback.
        overlay.close();
        overlay.confirm();
        overlay.open();
        overlay.remove();
        flush::flush();
        overlay.remove();
        flush::flush();

        assert_eq!(
            *log.borrow(),
            vec!["close", "confirm", "open", "remove", "remove"]
        );
    }

    #[test]
    fn queued_updates_resolve_in_issue_order() {
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        overlay.open();
        flush::flush();

        // open then close before the boundary: last-applied wins.
        overlay.open();
        overlay.close();
        flush::flush();
        assert!(!overlay.visible().get());

        overlay.close();
        overlay.open();
        flush::flush();
        assert!(overlay.visible().get());
    }

    #[test]
    fn remove_wins_against_pending_update_either_order() {
        // update queued first, teardown second
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        overlay.open();
        overlay.remove();
        flush::flush();
        assert!(overlay.descriptor().is_none());
        assert!(overlay.host_container().is_none());

        // teardown queued first, update second
        let overlay = OverlayController::new(dialog_config(), HeadlessHost::new());
        overlay.open();
        flush::flush();
        overlay.remove();
        overlay.update_config(ConfigUpdate::merge(Props::new().with("a", 1i64)));
        flush::flush();
        assert!(overlay.descriptor().is_none());
        assert!(overlay.host_container().is_none());
    }

    #[test]
    fn immediate_forces_initial_visibility() {
        let overlay =
            OverlayController::new(dialog_config().immediate(true), HeadlessHost::new());
        assert!(overlay.visible().get());

        let eager = OverlayController::new(
            dialog_config().immediate(true).lazy(false),
            HeadlessHost::new(),
        );
        let desc = eager.descriptor().unwrap();
        assert_eq!(desc.props().get("visible").and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn auto_deref_resolves_cells_on_open() {
        let cell = signal(PropValue::Int(5));
        let props = Props::new().with("count", PropValue::Cell(cell.clone()));

        let overlay = OverlayController::new(
            dialog_config().props(props.clone()),
            HeadlessHost::new(),
        );
        cell.set(PropValue::Int(7));
        overlay.open();
        flush::flush();
        let got = overlay.descriptor().unwrap().props().clone();
        assert!(!got.get("count").unwrap().is_cell());
        assert_eq!(got.get("count").and_then(|v| v.as_int()), Some(7));

        let raw = OverlayController::new(
            dialog_config().props(props).auto_deref(false),
            HeadlessHost::new(),
        );
        raw.open();
        flush::flush();
        let got = raw.descriptor().unwrap().props().clone();
        assert!(got.get("count").unwrap().is_cell());
    }

    #[test]
    fn custom_container_resolver_is_used() {
        let parent = ContainerNode::new();
        let overlay = OverlayController::new(
            dialog_config().container_in({
                let parent = parent.clone();
                move || parent.clone()
            }),
            HeadlessHost::new(),
        );

        overlay.open();
        assert!(overlay.parent_container().unwrap().ptr_eq(&parent));
        assert!(overlay.host_container().unwrap().parent().unwrap().ptr_eq(&parent));
        assert_eq!(parent.child_count(), 1);

        overlay.remove();
        flush::flush();
        assert_eq!(parent.child_count(), 0);
    }

    #[test]
    fn full_lifecycle_scenario() {
        let parent = ContainerNode::new();
        let overlay = OverlayController::new(
            dialog_config().container_in({
                let parent = parent.clone();
                move || parent.clone()
            }),
            HeadlessHost::new(),
        );
        assert!(overlay.descriptor().is_none());

        overlay.open();
        flush::flush();
        assert!(overlay.visible().get());
        assert!(overlay.host_container().unwrap().is_attached());

        overlay.close();
        flush::flush();
        assert!(!overlay.visible().get());
        assert!(overlay.descriptor().unwrap().is_mounted());

        overlay.remove();
        flush::flush();
        assert!(overlay.host_container().is_none());
        assert!(overlay.exposed().get().is_none());
        assert_eq!(parent.child_count(), 0);
    }

    #[test]
    fn slots_are_threaded_into_the_descriptor() {
        let mut slots = Slots::new();
        slots.insert(
            "footer".to_string(),
            scrim_core::SlotContent::Text("ok / cancel".to_string()),
        );

        let mut config = dialog_config().lazy(false);
        config.slots = slots;
        let overlay = OverlayController::new(config, HeadlessHost::new());

        let desc = overlay.descriptor().unwrap();
        assert!(desc.slots().contains_key("footer"));
    }
}
