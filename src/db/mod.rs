// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod convert;
pub mod firestore;

pub use firestore::FirestoreDb;
