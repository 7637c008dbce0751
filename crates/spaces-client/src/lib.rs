//! Typed access to the spaces API plus the client-side browse state that
//! drives it.

pub mod client;
pub mod error;
pub mod guard;
pub mod session;
pub mod url_sync;

pub use client::{SpacesClient, SpacesPage, SpacesRequest};
pub use error::ClientError;
pub use guard::{RequestGuard, RequestTicket};
pub use session::{BrowseSession, Fetched, LoadState};
pub use url_sync::UrlSync;
