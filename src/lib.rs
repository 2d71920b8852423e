// src/lib.rs

//! Unreleased commit reporting library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod storage;
pub mod utils;
