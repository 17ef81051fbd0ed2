//! Side effect free management of internal window manager state
pub mod client;
pub mod geometry;
pub mod monitor;
pub mod registry;
pub mod rules;
pub mod workspace;

#[doc(inline)]
pub use client::Client;
#[doc(inline)]
pub use monitor::Monitor;
#[doc(inline)]
pub use registry::ClientSet;
#[doc(inline)]
pub use rules::Rule;
#[doc(inline)]
pub use workspace::{Pane, Workspace};
