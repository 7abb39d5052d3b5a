//! Generic record data-access layer.
//!
//! Seven entity kinds share one CRUD engine driven by declarative field
//! mappings. Records may carry one media attachment, uploaded to object
//! storage before the row is written.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/{entity}` | List visible records, newest first |
//! | POST | `/api/{entity}` | Create (multipart) |
//! | GET | `/api/{entity}/{id}` | Fetch one record |
//! | PUT | `/api/{entity}/{id}` | Full replace (multipart) |
//! | DELETE | `/api/{entity}/{id}` | Hard or soft delete |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod media;
pub mod model;
pub mod routes;
pub mod schema;
pub mod services;

pub use error::{DalError, ErrorKind};
pub use model::{ListFilter, MediaFile, MediaInput, Record, RecordInput};
pub use schema::EntityKind;
pub use services::{
    BirthdayService, CelebrationService, CondolenceService, CrudEngine, DirectoryNodeService,
    MemberService, MessageService, NewsService,
};
