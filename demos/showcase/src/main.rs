//! Headless walkthrough of one overlay's life: bootstrap, open, patch,
//! close, remove, with a flush after each boundary-crossing step.

use std::rc::Rc;

use anyhow::Result;
use scrim_core::{
    AmbientContext, Exposed, HeadlessHost, OverlayComponent, PropValue, Props, RenderError,
    document_root, flush, set_ambient_context,
};
use scrim_overlay::{ConfigUpdate, OverlayConfig, OverlayController};

/// App-level services a real host would hand to dynamically created
/// instances: a theme name stands in for the whole dependency bag.
struct AppServices {
    theme: &'static str,
}

struct ConfirmDialog;

impl OverlayComponent for ConfirmDialog {
    fn type_name(&self) -> &str {
        "ConfirmDialog"
    }

    fn instantiate(&self, props: &Props) -> Result<Option<Exposed>, RenderError> {
        let title = props
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        log::info!("ConfirmDialog instantiated (title: {title:?})");
        Ok(Some(Rc::new(format!("confirm:{title}"))))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    // Bootstrap: the host application installs its context once.
    set_ambient_context(AmbientContext::new(AppServices { theme: "dark" }));

    let host = HeadlessHost::new();
    let confirmed = Rc::new(std::cell::Cell::new(false));

    let overlay = OverlayController::new(
        OverlayConfig::new(Rc::new(ConfirmDialog))
            .props(
                Props::new()
                    .with("title", "Discard changes?")
                    .with("count", PropValue::cell(PropValue::Int(0))),
            )
            .on_open(|| log::info!("on_open"))
            .on_close(|| log::info!("on_close"))
            .on_confirm({
                let confirmed = confirmed.clone();
                move || {
                    confirmed.set(true);
                    log::info!("on_confirm");
                }
            })
            .on_remove(|| log::info!("on_remove")),
        host,
    );

    overlay.open();
    flush::flush();
    log::info!(
        "after open: visible={}, root children={}",
        overlay.visible().get(),
        document_root().child_count()
    );
    if let Some(ctx) = overlay.descriptor().and_then(|d| d.context().cloned()) {
        let theme = ctx.downcast_ref::<AppServices>().map(|s| s.theme);
        log::info!("overlay sees ambient theme: {theme:?}");
    }

    overlay.update_config(ConfigUpdate::merge(
        Props::new().with("title", "Discard 3 changes?"),
    ));
    flush::flush();
    log::info!(
        "after patch: title={:?}",
        overlay
            .descriptor()
            .and_then(|d| d.props().get("title").and_then(|v| v.as_str()))
    );

    overlay.confirm();
    flush::flush();
    log::info!(
        "after confirm: visible={}, confirmed={}",
        overlay.visible().get(),
        confirmed.get()
    );

    overlay.remove();
    flush::flush();
    log::info!(
        "after remove: descriptor={}, root children={}",
        overlay.descriptor().is_some(),
        document_root().child_count()
    );

    Ok(())
}
