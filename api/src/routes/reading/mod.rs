pub mod reading_request;
pub mod reading_response;
pub mod reading_route;
