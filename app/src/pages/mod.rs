//! One controller per page, mirroring the public feed, single article,
//! editor form and admin dashboard.

pub mod admin;
pub mod article;
pub mod editor;
pub mod home;

pub use admin::AdminPage;
pub use article::ArticlePage;
pub use editor::EditorPage;
pub use home::HomePage;
