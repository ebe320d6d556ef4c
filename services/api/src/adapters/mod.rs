pub mod db;

pub use db::DbAdapter;
pub use ideaboard_core::memory::InMemoryDatabase;
