pub mod auth;
pub mod content;

pub use auth::login;
pub use content::{book_show, books_list, party_literasi_list, party_literasi_show, visitor_register};
