// keenroute-api: Async Rust client for the Keenetic NDMS RCI API

pub mod error;
pub mod rci;
pub mod transport;

pub use error::Error;
pub use rci::RciClient;
pub use rci::SessionState;
pub use rci::auth::challenge_response;
pub use rci::models::{FlexBool, FlexInt, FlexString, RciBatch, RouteRecord};
pub use transport::{TlsMode, TransportConfig};
