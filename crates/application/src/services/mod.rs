//! Application services - Use case implementations

mod commute_service;
mod mock_commute;

pub use commute_service::{
    CommuteService, NO_ROUTES_FOUND, NO_UPCOMING_EVENTS, next_event_with_location,
};
pub use mock_commute::{mock_commute_data, mock_routes};
