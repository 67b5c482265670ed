pub mod auth;
pub mod backend;
pub mod clock;
pub mod logging;
pub mod quests;
pub mod rumors;
pub mod session;
pub mod slug;
