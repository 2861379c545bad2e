pub mod delivery_routes;
pub mod geocoding_routes;
pub mod rate_routes;
pub mod vehicle_routes;
