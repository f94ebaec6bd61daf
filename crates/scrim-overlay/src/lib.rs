//! # Imperative overlay lifecycle
//!
//! Modal dialogs and similar ephemeral overlays are not part of any
//! declarative tree: calling code creates them on demand, shows and
//! reconfigures them, and tears them down. `OverlayController` owns exactly
//! one such instance and drives it through `Uninitialized`,
//! `Mounted-Hidden`, `Mounted-Visible`, and `Disposed`.
//!
//! ```rust
//! use std::rc::Rc;
//! use scrim_core::{flush, HeadlessHost, OverlayComponent, Props, RenderError};
//! use scrim_overlay::{OverlayConfig, OverlayController};
//!
//! struct Confirm;
//! impl OverlayComponent for Confirm {
//!     fn type_name(&self) -> &str {
//!         "Confirm"
//!     }
//!     fn instantiate(
//!         &self,
//!         _props: &Props,
//!     ) -> Result<Option<scrim_core::Exposed>, RenderError> {
//!         Ok(None)
//!     }
//! }
//!
//! let overlay = OverlayController::new(
//!     OverlayConfig::new(Rc::new(Confirm)).props(Props::new().with("title", "Sure?")),
//!     HeadlessHost::new(),
//! );
//!
//! overlay.open();
//! flush::flush();
//! assert!(overlay.visible().get());
//!
//! overlay.close();
//! flush::flush();
//! assert!(!overlay.visible().get());
//!
//! overlay.remove();
//! flush::flush();
//! assert!(overlay.descriptor().is_none());
//! ```
//!
//! Deferred semantics: `open`/`close`/`confirm` run synchronously but queue
//! their prop patch for the next flush boundary; `remove` defers entirely.
//! Reconfiguration replaces the descriptor with a clone (reset: exactly the
//! patch; merge: union, patch wins) — see `ConfigUpdate`.

pub mod config;
pub mod controller;
pub mod tests;

pub use config::*;
pub use controller::*;
