//! Community hub back office: announcements, member registry, contact
//! messages and directory, stored through one generic data-access layer.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
