//! Relevo - a client-side search relevance engine with persistent query state.
//!
//! Relevo powers resource-directory pages: a free-text query is classified
//! into intent signals, every item is scored against it through a tiered
//! additive relevance model, discrete attribute filters are applied, and
//! the ranked list is emitted to the host. The search/filter state is kept
//! consistent across memory, the URL query string, and session storage,
//! surviving reloads and external-link round trips.

pub mod types;
pub mod intent;
pub mod scorer;
pub mod debounce;
pub mod controller;
pub mod state;
pub mod error;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::controller::*;
    pub use crate::debounce::*;
    pub use crate::error::*;
    pub use crate::intent::*;
    pub use crate::scorer::*;
    pub use crate::state::*;
    pub use crate::types::*;
}
