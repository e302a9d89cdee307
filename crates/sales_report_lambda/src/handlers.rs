pub mod response;
pub mod sales_by_location;
