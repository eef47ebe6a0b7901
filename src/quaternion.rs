//! 四元数
//!
//! 标量 + 三维向量，共 4 个分量。
//! 乘法约定：`v = a1*v2 + a2*v1 - v1 x v2`（叉积取负号）。

use std::ops::{Add, Div, Mul, Neg};

use serde::{Deserialize, Serialize};

use crate::config::EPS;
use crate::global_types::{AlgebraError, Operand};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// 实部
    pub a: f64,
    /// 向量部
    pub v: nalgebra::Vector3<f64>,
}

impl Quaternion {
    #[inline]
    pub fn new(a: f64, v: nalgebra::Vector3<f64>) -> Self {
        Self { a, v }
    }

    /// 单位四元数 (1, 0, 0, 0)
    #[inline]
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            v: nalgebra::Vector3::zeros(),
        }
    }

    /// 纯四元数：实部为 0
    #[inline]
    pub fn from_vector(vector: nalgebra::Vector3<f64>) -> Self {
        Self { a: 0.0, v: vector }
    }

    /// 轴角构造单位旋转四元数 (cos(angle/2), sin(angle/2) * axis/|axis|)
    ///
    /// 轴长为零时返回 [AlgebraError::ZeroNorm]
    pub fn from_axis_angle(
        axis: nalgebra::Vector3<f64>,
        angle: f64,
    ) -> Result<Self, AlgebraError> {
        let axis_norm = axis.norm();
        if axis_norm == 0.0 {
            return Err(AlgebraError::ZeroNorm { context: "axis" });
        }
        let a = (angle / 2.0).cos();
        let v = (angle / 2.0).sin() * axis / axis_norm;
        Ok(Self { a, v })
    }

    pub fn add(&self, other: &Quaternion) -> Quaternion {
        *self + *other
    }

    /// 标量乘：4 个分量同乘
    #[inline]
    pub fn scale(&self, s: f64) -> Quaternion {
        Quaternion {
            a: self.a * s,
            v: self.v * s,
        }
    }

    /// 左乘分发：标量或四元数
    pub fn multiply(&self, rhs: impl Into<Operand<Quaternion>>) -> Quaternion {
        match rhs.into() {
            Operand::Scalar(s) => self.scale(s),
            Operand::Value(q) => *self * q,
        }
    }

    /// 右乘分发：只支持标量，`other * self`
    pub fn right_multiply(
        &self,
        lhs: impl Into<Operand<Quaternion>>,
    ) -> Result<Quaternion, AlgebraError> {
        match lhs.into() {
            Operand::Scalar(s) => Ok(self.scale(s)),
            Operand::Value(_) => Err(AlgebraError::RightMultiply {
                target: "Quaternion",
                operand: "Quaternion",
            }),
        }
    }

    /// 共轭：向量部取负
    #[inline]
    pub fn conj(&self) -> Quaternion {
        Quaternion {
            a: self.a,
            v: -self.v,
        }
    }

    /// 4 分量的欧氏范数
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.a * self.a + self.v.norm_squared()).sqrt()
    }

    /// 归一化，范数为零时返回 [AlgebraError::ZeroNorm]
    pub fn normalize(&self) -> Result<Quaternion, AlgebraError> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(AlgebraError::ZeroNorm {
                context: "Quaternion",
            });
        }
        Ok(self.scale(1.0 / norm))
    }

    /// 旋转三维向量：夹乘 `q * p * q.conj()`
    ///
    /// 要求 `|norm - 1| < EPS`
    pub fn transform_vector(
        &self,
        vector: nalgebra::Vector3<f64>,
    ) -> Result<nalgebra::Vector3<f64>, AlgebraError> {
        let norm = self.norm();
        if (norm - 1.0).abs() >= EPS {
            return Err(AlgebraError::NotNormalized { norm });
        }
        let p = Quaternion::from_vector(vector);
        Ok((*self * p * self.conj()).v)
    }
}

/// 单位四元数
impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<f64> for Operand<Quaternion> {
    fn from(s: f64) -> Self {
        Operand::Scalar(s)
    }
}

impl From<Quaternion> for Operand<Quaternion> {
    fn from(q: Quaternion) -> Self {
        Operand::Value(q)
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, rhs: Quaternion) -> Quaternion {
        Quaternion {
            a: self.a + rhs.a,
            v: self.v + rhs.v,
        }
    }
}

/// 四元数乘法
///
/// a = a1*a2 - v1.v2
/// v = a1*v2 + a2*v1 - v1 x v2
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        let a = self.a * rhs.a - self.v.dot(&rhs.v);
        let v = self.a * rhs.v + rhs.a * self.v - self.v.cross(&rhs.v);
        Quaternion { a, v }
    }
}

impl Mul<f64> for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: f64) -> Quaternion {
        self.scale(rhs)
    }
}

/// 标量左乘
impl Mul<Quaternion> for f64 {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        rhs.scale(self)
    }
}

impl Div<f64> for Quaternion {
    type Output = Quaternion;

    fn div(self, rhs: f64) -> Quaternion {
        self * (1.0 / rhs)
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion {
            a: -self.a,
            v: -self.v,
        }
    }
}

#[test]
fn test_from_vector() {
    let q = Quaternion::from_vector(nalgebra::Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(q.a, 0.0);
    assert_eq!(q.v, nalgebra::Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_from_axis_angle() {
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    let q = Quaternion::from_axis_angle(nalgebra::Vector3::new(0.0, 1.0, 0.0), PI / 2.0).unwrap();
    assert_abs_diff_eq!(q.a, (PI / 4.0).cos(), epsilon = 1e-12);
    assert_abs_diff_eq!(
        q.v,
        nalgebra::Vector3::new(0.0, (PI / 4.0).sin(), 0.0),
        epsilon = 1e-12
    );

    // 轴不必预先归一化
    for (axis, angle) in [
        (nalgebra::Vector3::new(1.0, 2.0, -2.0), 0.7),
        (nalgebra::Vector3::new(0.0, 0.0, 3.0), -2.1),
        (nalgebra::Vector3::new(-5.0, 1.0, 0.5), PI),
    ] {
        let q = Quaternion::from_axis_angle(axis, angle).unwrap();
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_from_axis_angle_zero_axis() {
    let res = Quaternion::from_axis_angle(nalgebra::Vector3::zeros(), 1.0);
    assert!(matches!(res, Err(AlgebraError::ZeroNorm { context: "axis" })));
}

#[test]
fn test_add() {
    let q1 = Quaternion::new(1.0, nalgebra::Vector3::new(2.0, 3.0, 4.0));
    let q2 = Quaternion::new(0.5, nalgebra::Vector3::new(-2.0, 1.0, 1.0));
    let sum = Quaternion::add(&q1, &q2);
    assert_eq!(sum.a, 1.5);
    assert_eq!(sum.v, nalgebra::Vector3::new(0.0, 4.0, 5.0));
}

#[test]
fn test_multiply_dispatch() {
    let q = Quaternion::new(1.0, nalgebra::Vector3::new(0.0, 2.0, 0.0));

    let scaled = q.multiply(2.0);
    assert_eq!(scaled.a, 2.0);
    assert_eq!(scaled.v, nalgebra::Vector3::new(0.0, 4.0, 0.0));

    let q2 = Quaternion::identity();
    let prod = q.multiply(q2);
    assert_eq!(prod, q);
}

#[test]
fn test_mul_convention() {
    // i * j = -k（叉积取负号）
    let i = Quaternion::from_vector(nalgebra::Vector3::new(1.0, 0.0, 0.0));
    let j = Quaternion::from_vector(nalgebra::Vector3::new(0.0, 1.0, 0.0));

    let ij = i * j;
    assert_eq!(ij.a, 0.0);
    assert_eq!(ij.v, nalgebra::Vector3::new(0.0, 0.0, -1.0));

    let ji = j * i;
    assert_eq!(ji.v, nalgebra::Vector3::new(0.0, 0.0, 1.0));
    assert_ne!(ij, ji);
}

#[test]
fn test_mul_associative() {
    use approx::assert_abs_diff_eq;

    let q1 = Quaternion::from_axis_angle(nalgebra::Vector3::new(1.0, 0.0, 0.0), 0.3).unwrap();
    let q2 = Quaternion::from_axis_angle(nalgebra::Vector3::new(0.0, 1.0, 0.0), 1.1).unwrap();
    let q3 = Quaternion::new(0.5, nalgebra::Vector3::new(0.2, -0.7, 1.3));

    let left = (q1 * q2) * q3;
    let right = q1 * (q2 * q3);
    assert_abs_diff_eq!(left.a, right.a, epsilon = 1e-12);
    assert_abs_diff_eq!(left.v, right.v, epsilon = 1e-12);
}

#[test]
fn test_conj_preserves_norm() {
    use approx::assert_abs_diff_eq;

    let q = Quaternion::new(0.3, nalgebra::Vector3::new(1.0, -2.0, 0.5));
    assert_abs_diff_eq!(q.conj().norm(), q.norm(), epsilon = 1e-12);
    assert_eq!(q.conj().a, q.a);
    assert_eq!(q.conj().v, -q.v);
}

#[test]
fn test_right_multiply() {
    let q = Quaternion::new(1.0, nalgebra::Vector3::new(0.0, 2.0, 0.0));
    let scaled = q.right_multiply(3.0).unwrap();
    assert_eq!(scaled.a, 3.0);

    let err = q.right_multiply(Quaternion::identity()).unwrap_err();
    assert!(matches!(err, AlgebraError::RightMultiply { .. }));
    println!("err = {}", err);
}

#[test]
fn test_normalize() {
    use approx::assert_abs_diff_eq;

    let q = Quaternion::new(3.0, nalgebra::Vector3::new(0.0, 4.0, 0.0));
    let unit = q.normalize().unwrap();
    assert_abs_diff_eq!(unit.norm(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(unit.a, 0.6, epsilon = 1e-12);

    let zero = Quaternion::new(0.0, nalgebra::Vector3::zeros());
    assert!(matches!(
        zero.normalize(),
        Err(AlgebraError::ZeroNorm { .. })
    ));
}

#[test]
fn test_transform_vector() {
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    // 绕 Y 轴旋转 90 度
    let r = Quaternion::from_axis_angle(nalgebra::Vector3::new(0.0, 1.0, 0.0), PI / 2.0).unwrap();
    let rotated = r.transform_vector(nalgebra::Vector3::new(1.0, 0.0, 0.0)).unwrap();
    assert_abs_diff_eq!(rotated, nalgebra::Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

    // 旋转保持长度
    let v = nalgebra::Vector3::new(2.0, 3.0, 4.0);
    assert_abs_diff_eq!(r.transform_vector(v).unwrap().norm(), v.norm(), epsilon = 1e-12);

    let not_unit = Quaternion::new(1.1, nalgebra::Vector3::zeros());
    assert!(matches!(
        not_unit.transform_vector(v),
        Err(AlgebraError::NotNormalized { .. })
    ));
}
