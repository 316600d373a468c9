pub mod account;
pub mod phonebook;
pub mod session;
pub mod uri;

pub use account::{Account, Balance};
pub use phonebook::{Contact, Phonebook};
pub use session::Session;
pub use uri::Uri;
