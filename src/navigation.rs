//! Admin console navigation: the query-string codec, the history-backed
//! navigator and the state-to-view router.

mod codec;
mod navigator;
mod router;

pub use codec::{
    decode, encode, serialize, AdminView, NavigationState, NavigationUpdate, UnknownView,
};
pub use navigator::Navigator;
pub use router::{route, ViewRoute};
