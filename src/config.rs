//! Configuration for folio.
//!
//! [load] reads `folio.toml` into [Config]. The tables are split by concern:
//! [general], [limits], [integrations] (share command and content providers) and [input] (keys).

pub(crate) mod general;
pub(crate) mod input;
pub(crate) mod integrations;
pub(crate) mod limits;
pub(crate) mod load;

pub(crate) use general::{General, InternalGeneral};
pub(crate) use input::Keys;
pub(crate) use limits::Limits;
pub(crate) use load::Config;
