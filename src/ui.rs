//! Terminal UI for folio.
//!
//! - [render]: the per-frame entry point, see [render::render].
//! - [overlays]: the dialog stack drawn on top of the screens.
//! - [widgets]: dialog layout helpers and the individual draw functions.

pub(crate) mod overlays;
pub(crate) mod render;
pub(crate) mod widgets;

pub(crate) use render::render;
