pub mod destination;
pub mod home;
pub mod not_found;
