pub mod contact;
pub mod external_construction;
pub mod listing;
pub mod property;
pub mod property_image;
pub mod user;
