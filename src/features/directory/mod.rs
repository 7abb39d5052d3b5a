//! Community directory views.
//!
//! Directory nodes are ordinary records (`/api/directory`); this feature
//! adds the nested read model.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/directory/tree` | Active nodes as a district → city → member tree |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::DirectoryService;
