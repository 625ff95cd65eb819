//! Statistics sink doubles.
