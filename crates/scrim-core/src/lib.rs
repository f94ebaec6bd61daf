//! # Signals, scopes, and the flush boundary
//!
//! Scrim manages overlays imperatively on top of a small reactive core.
//! Three pieces matter to overlay code:
//!
//! - `Signal<T>` — observable, reactive value.
//! - `Scope` / `on_scope_dispose` — ownership scopes with teardown hooks.
//! - `flush` — the explicit FIFO task queue that models the host runtime's
//!   rendering flush boundary.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use scrim_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## The flush boundary
//!
//! Deferred mutations (prop patches, teardown) are scheduled with
//! `flush::schedule` and applied when the host runner calls `flush::flush()`.
//! Tasks resolve strictly in schedule order:
//!
//! ```rust
//! use scrim_core::flush;
//!
//! flush::schedule(|| log::debug!("applied at the boundary"));
//! assert_eq!(flush::flush(), 1);
//! ```
//!
//! ## Render contract
//!
//! Controllers never draw anything themselves. They consume a `RenderHost`
//! — create / mount / unmount / clone-with-overridden-props — and leave
//! diffing and painting to the host framework. `HeadlessHost` is the
//! in-tree reference implementation, enough for tests and headless demos.
//!
//! ## Ambient context
//!
//! Dynamically mounted instances resolve app-level dependencies through an
//! opaque `AmbientContext` handle, installed once at bootstrap via
//! `set_ambient_context` and attached to descriptors at init.

pub mod container;
pub mod context;
pub mod descriptor;
pub mod flush;
pub mod host;
pub mod props;
pub mod scope;
pub mod signal;

pub use container::*;
pub use context::*;
pub use descriptor::*;
pub use host::*;
pub use props::*;
pub use scope::*;
pub use signal::*;
