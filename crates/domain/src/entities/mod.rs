//! Domain entities

mod commute;
mod route;

pub use commute::CommuteData;
pub use route::{Leg, RouteMode, RouteSummary};
