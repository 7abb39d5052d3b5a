mod entity_services;
mod record_service;

pub use entity_services::{
    BirthdayService, CelebrationService, CondolenceService, DirectoryNodeService, MemberService,
    MessageService, NewsService,
};
pub use record_service::CrudEngine;
