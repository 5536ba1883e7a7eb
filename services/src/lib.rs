pub mod ranking;
pub mod resource;
pub mod resource_query;
