// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-Backup: export Firestore collections to a local JSON file
//!
//! This crate connects to Firestore with a service-account key, reads a
//! fixed list of collections one after another, and writes them as a
//! single pretty-printed JSON document.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
