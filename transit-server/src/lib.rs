//! Transit trip planner server.
//!
//! A web application that answers: "Which routes do I ride, and where do I
//! change, to get from here to there?"

pub mod cache;
pub mod geometry;
pub mod network;
pub mod planner;
pub mod route;
pub mod web;
