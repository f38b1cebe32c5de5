pub mod accessor;
pub mod config;
pub mod events;
pub mod metrics_server;
pub mod observability;
pub mod server;
pub mod store;
pub mod view;

pub use accessor::{DataAccessor, Lookup, NotFound};
pub use view::DashboardView;
