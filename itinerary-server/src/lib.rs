//! Archipelago itinerary planner server.
//!
//! A web application that answers: "if I leave now and visit these stops in
//! order, which ferries and drives can I take, and what follows each?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod feed;
pub mod planner;
pub mod segments;
pub mod web;
