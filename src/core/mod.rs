pub mod comparator;
pub mod services;
pub mod staging;
