//! 对偶四元数代数库
//!
//! 表示和复合三维刚体旋转和平移，并将变换作用于点。
//!
//! nalgebra
//! https://docs.rs/nalgebra/latest/nalgebra/

mod config;
mod dual_quaternion;
mod global_cast;
mod global_types;
mod quaternion;

pub use config::EPS;
pub use dual_quaternion::DualQuaternion;
pub use global_types::{AlgebraError, Operand};
pub use quaternion::Quaternion;
