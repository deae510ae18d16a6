//! Public transport departures server.
//!
//! A web application that answers: "I'm standing here and want to get
//! there; what can I board nearby, and when does it leave?"

pub mod config;
pub mod departures;
pub mod domain;
pub mod geo;
pub mod gtfs;
pub mod trips;
pub mod web;
