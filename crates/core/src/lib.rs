//! Domain types and collaborator traits for the FaceGate recognition service.

pub mod employee;
pub mod encoding;
pub mod error;
pub mod face_engine;
pub mod hashing;
pub mod recognition;
pub mod storage;
pub mod types;
