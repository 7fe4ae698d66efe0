pub mod booking;
pub mod business_account;
pub mod service;
pub mod specialist;
pub mod user;

pub use booking::{Booking, BookingStatus, CreateBookingRequest};
pub use business_account::{
    BusinessAccount, CreateBusinessAccountRequest, UpdateBusinessAccountRequest,
};
pub use service::{
    CreateServiceRequest, ListServicesQuery, Service, ServiceFilter, ServicePage,
    UpdateServiceRequest,
};
pub use specialist::{AreaType, SpecialistSearchQuery, SpecialistSearchResponse};
pub use user::{UpdateUserRequest, User};
