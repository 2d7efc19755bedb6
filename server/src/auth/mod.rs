mod crypto;
mod db;
mod extractor;

pub use db::SessionIdentityProvider;
pub use extractor::Caller;
