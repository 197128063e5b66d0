//! Stateless helpers shared by the controllers

pub mod events;
pub mod form_validation;
pub mod namespace;
pub mod resource_reservation;
