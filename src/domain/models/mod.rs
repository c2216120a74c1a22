pub mod auth;
pub mod event;
pub mod invitee;
pub mod rsvp;
pub mod user;
