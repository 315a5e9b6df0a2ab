pub mod linalg;
pub mod spline;
