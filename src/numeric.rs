//! Basic numerical concepts used throughout the program

#![allow(missing_docs)]

// Kinematics are always computed in double precision
pub type Float = f64;
