//! Math types used by the renderer.
//!
//! CPU-side math goes through [`glam`] (SIMD where available). Anything that
//! ends up in a GPU buffer uses plain `#[repr(C)]` arrays instead, so it can be
//! cast with `bytemuck`.
//!
//! ```
//! use sparrow_core::math::{Mat4, Vec3};
//!
//! let model = Mat4::from_translation(Vec3::new(10.0, 20.0, 0.0));
//! let corner = model.transform_point3(Vec3::ZERO);
//! assert_eq!(corner, Vec3::new(10.0, 20.0, 0.0));
//! ```

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

