//! 对偶四元数
//!
//! 实部 qr 编码旋转，对偶部 qd 编码平移：`qd = 0.5 * t * qr`。
//! 单位对偶四元数（`|qr| = 1`）表示一个刚体变换。

use std::ops::{Add, Div, Mul};

use serde::{Deserialize, Serialize};

use crate::config::EPS;
use crate::global_types::{AlgebraError, Operand};
use crate::quaternion::Quaternion;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualQuaternion {
    /// 实部（旋转）
    pub qr: Quaternion,
    /// 对偶部（平移）
    pub qd: Quaternion,
}

impl DualQuaternion {
    /// 单位变换：无旋转，无平移
    #[inline]
    pub fn identity() -> Self {
        Self {
            qr: Quaternion::identity(),
            qd: Quaternion::from_vector(nalgebra::Vector3::zeros()),
        }
    }

    /// 点的嵌入：纯平移 `vector`
    ///
    /// 乘 2 抵消 [DualQuaternion::from_rot_trans] 里的 0.5
    pub fn from_vector(vector: nalgebra::Vector3<f64>) -> Self {
        Self::from_rot_trans(Quaternion::identity(), vector * 2.0)
    }

    /// 由旋转四元数和平移向量构造
    pub fn from_rot_trans(rotation: Quaternion, translation: nalgebra::Vector3<f64>) -> Self {
        let t = Quaternion::from_vector(translation);
        log::trace!("t = {}", t);
        Self {
            qr: rotation,
            qd: 0.5 * t * rotation,
        }
    }

    /// 刚体变换作用于一个点
    ///
    /// 夹乘 `q * v * q.conj_negative()`，再从结果提取平移。
    pub fn transform_vector(
        &self,
        vector: nalgebra::Vector3<f64>,
    ) -> Result<nalgebra::Vector3<f64>, AlgebraError> {
        let v = DualQuaternion::from_vector(vector);
        log::trace!("v = {}", v);
        log::trace!("q = {}", self);
        let v_p = *self * v * self.conj_negative();
        log::trace!("v_p = {}", v_p);
        let (_qr, translation) = v_p.to_rot_trans()?;
        Ok(translation / 2.0)
    }

    /// 提取旋转和平移
    ///
    /// 要求 `|norm - 1| < EPS`，否则返回 [AlgebraError::NotNormalized]。
    /// 平移为 `2 * (qd * qr.conj()).v`。
    pub fn to_rot_trans(&self) -> Result<(Quaternion, nalgebra::Vector3<f64>), AlgebraError> {
        let norm = self.norm();
        if (norm - 1.0).abs() >= EPS {
            return Err(AlgebraError::NotNormalized { norm });
        }

        let translation = 2.0 * (self.qd * self.qr.conj()).v;
        Ok((self.qr, translation))
    }

    pub fn add(&self, other: &DualQuaternion) -> DualQuaternion {
        *self + *other
    }

    /// 标量乘：两部分同乘
    #[inline]
    pub fn scale(&self, s: f64) -> DualQuaternion {
        DualQuaternion {
            qr: self.qr.scale(s),
            qd: self.qd.scale(s),
        }
    }

    /// 左乘分发：标量或对偶四元数
    pub fn multiply(&self, rhs: impl Into<Operand<DualQuaternion>>) -> DualQuaternion {
        match rhs.into() {
            Operand::Scalar(s) => self.scale(s),
            Operand::Value(q) => *self * q,
        }
    }

    /// 右乘分发：只支持标量
    pub fn right_multiply(
        &self,
        lhs: impl Into<Operand<DualQuaternion>>,
    ) -> Result<DualQuaternion, AlgebraError> {
        match lhs.into() {
            Operand::Scalar(s) => Ok(self.scale(s)),
            Operand::Value(_) => Err(AlgebraError::RightMultiply {
                target: "DualQuaternion",
                operand: "DualQuaternion",
            }),
        }
    }

    /// 共轭：两部分分别共轭
    #[inline]
    pub fn conj(&self) -> DualQuaternion {
        DualQuaternion {
            qr: self.qr.conj(),
            qd: self.qd.conj(),
        }
    }

    /// 夹乘用的共轭：qr 共轭，qd 共轭再取负
    #[inline]
    pub fn conj_negative(&self) -> DualQuaternion {
        DualQuaternion {
            qr: self.qr.conj(),
            qd: -self.qd.conj(),
        }
    }

    /// 范数只看实部：单位对偶四元数只要求 `|qr| = 1`
    #[inline]
    pub fn norm(&self) -> f64 {
        self.qr.norm()
    }

    /// 归一化，范数为零时返回 [AlgebraError::ZeroNorm]
    pub fn normalize(&self) -> Result<DualQuaternion, AlgebraError> {
        let norm = self.norm();
        if norm == 0.0 {
            return Err(AlgebraError::ZeroNorm {
                context: "DualQuaternion",
            });
        }
        Ok(self.scale(1.0 / norm))
    }
}

/// 单位变换
impl Default for DualQuaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<f64> for Operand<DualQuaternion> {
    fn from(s: f64) -> Self {
        Operand::Scalar(s)
    }
}

impl From<DualQuaternion> for Operand<DualQuaternion> {
    fn from(q: DualQuaternion) -> Self {
        Operand::Value(q)
    }
}

impl Add for DualQuaternion {
    type Output = DualQuaternion;

    fn add(self, rhs: DualQuaternion) -> DualQuaternion {
        DualQuaternion {
            qr: self.qr + rhs.qr,
            qd: self.qd + rhs.qd,
        }
    }
}

/// 对偶数乘法规则
///
/// qr = qr1*qr2
/// qd = qr1*qd2 + qd1*qr2
impl Mul for DualQuaternion {
    type Output = DualQuaternion;

    fn mul(self, rhs: DualQuaternion) -> DualQuaternion {
        DualQuaternion {
            qr: self.qr * rhs.qr,
            qd: self.qr * rhs.qd + self.qd * rhs.qr,
        }
    }
}

impl Mul<f64> for DualQuaternion {
    type Output = DualQuaternion;

    fn mul(self, rhs: f64) -> DualQuaternion {
        self.scale(rhs)
    }
}

/// 标量左乘
impl Mul<DualQuaternion> for f64 {
    type Output = DualQuaternion;

    fn mul(self, rhs: DualQuaternion) -> DualQuaternion {
        rhs.scale(self)
    }
}

impl Div<f64> for DualQuaternion {
    type Output = DualQuaternion;

    fn div(self, rhs: f64) -> DualQuaternion {
        self * (1.0 / rhs)
    }
}

#[test]
fn test_from_vector_embedding() {
    let v = nalgebra::Vector3::new(1.0, -2.0, 3.0);
    let dq = DualQuaternion::from_vector(v);
    assert_eq!(dq.qr, Quaternion::identity());
    assert_eq!(dq.qd, Quaternion::from_vector(v));
}

#[test]
fn test_rot_trans_round_trip() {
    use approx::assert_abs_diff_eq;

    let r = Quaternion::from_axis_angle(nalgebra::Vector3::new(1.0, 1.0, 0.0), 0.8).unwrap();
    let t = nalgebra::Vector3::new(5.0, -3.0, 1.0);
    let dq = DualQuaternion::from_rot_trans(r, t);

    let (r_out, t_out) = dq.to_rot_trans().unwrap();
    assert_eq!(r_out, r);
    assert_abs_diff_eq!(t_out, t, epsilon = 1e-12);
}

#[test]
fn test_to_rot_trans_rejects_not_normalized() {
    let r = Quaternion::new(1.1, nalgebra::Vector3::zeros());
    let dq = DualQuaternion::from_rot_trans(r, nalgebra::Vector3::new(1.0, 0.0, 0.0));

    match dq.to_rot_trans() {
        Err(AlgebraError::NotNormalized { norm }) => {
            use approx::assert_abs_diff_eq;
            assert_abs_diff_eq!(norm, 1.1, epsilon = 1e-12);
        }
        other => panic!("expected NotNormalized, got {:?}", other),
    }
}

#[test]
fn test_identity_transform() {
    use approx::assert_abs_diff_eq;

    let id = DualQuaternion::identity();
    let v = nalgebra::Vector3::new(1.0, -7.0, 2.5);
    assert_abs_diff_eq!(id.transform_vector(v).unwrap(), v, epsilon = 1e-12);

    let id = DualQuaternion::from_rot_trans(Quaternion::identity(), nalgebra::Vector3::zeros());
    assert_abs_diff_eq!(id.transform_vector(v).unwrap(), v, epsilon = 1e-12);
}

#[test]
fn test_rotation_only_matches_quaternion_sandwich() {
    use approx::assert_abs_diff_eq;

    let r = Quaternion::from_axis_angle(nalgebra::Vector3::new(0.3, -1.0, 0.4), 1.2).unwrap();
    let dq = DualQuaternion::from_rot_trans(r, nalgebra::Vector3::zeros());

    let v = nalgebra::Vector3::new(2.0, 0.5, -1.0);
    let by_dual = dq.transform_vector(v).unwrap();
    let by_quat = r.transform_vector(v).unwrap();
    assert_abs_diff_eq!(by_dual, by_quat, epsilon = 1e-9);
}

#[test]
fn test_translation_only() {
    use approx::assert_abs_diff_eq;

    let t = nalgebra::Vector3::new(10.0, 20.0, 30.0);
    let dq = DualQuaternion::from_rot_trans(Quaternion::identity(), t);

    let v = nalgebra::Vector3::new(1.0, 2.0, 3.0);
    assert_abs_diff_eq!(dq.transform_vector(v).unwrap(), v + t, epsilon = 1e-9);
}

#[test]
fn test_composition() {
    use approx::assert_abs_diff_eq;

    let a = DualQuaternion::from_rot_trans(
        Quaternion::from_axis_angle(nalgebra::Vector3::new(1.0, 0.0, 0.0), 0.3).unwrap(),
        nalgebra::Vector3::new(1.0, 2.0, 3.0),
    );
    let b = DualQuaternion::from_rot_trans(
        Quaternion::from_axis_angle(nalgebra::Vector3::new(0.0, 0.0, 1.0), 0.9).unwrap(),
        nalgebra::Vector3::new(-4.0, 0.0, 2.0),
    );

    let v = nalgebra::Vector3::new(0.5, -1.5, 2.0);
    let chained = b.transform_vector(a.transform_vector(v).unwrap()).unwrap();
    let composed = (b * a).transform_vector(v).unwrap();
    assert_abs_diff_eq!(chained, composed, epsilon = 1e-9);
}

#[test]
fn test_transform_y90() {
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    let _ = env_logger::builder().is_test(true).try_init();

    let r = Quaternion::from_axis_angle(nalgebra::Vector3::new(0.0, 1.0, 0.0), PI / 2.0).unwrap();
    let t = nalgebra::Vector3::new(50.0, 40.0, 30.0);
    let q = DualQuaternion::from_rot_trans(r, t);

    // (1,0,0) -> (0,0,1)，再平移
    let out = q.transform_vector(nalgebra::Vector3::new(1.0, 0.0, 0.0)).unwrap();
    assert_abs_diff_eq!(out, nalgebra::Vector3::new(50.0, 40.0, 31.0), epsilon = 1e-9);

    // (6,4,2) -> (-2,4,6)，再平移
    let out = q.transform_vector(nalgebra::Vector3::new(6.0, 4.0, 2.0)).unwrap();
    assert_abs_diff_eq!(out, nalgebra::Vector3::new(48.0, 44.0, 36.0), epsilon = 1e-9);
}

#[test]
fn test_norm_ignores_dual_part() {
    let r = Quaternion::from_axis_angle(nalgebra::Vector3::new(0.0, 1.0, 0.0), 0.5).unwrap();
    let dq = DualQuaternion::from_rot_trans(r, nalgebra::Vector3::new(100.0, 200.0, 300.0));
    use approx::assert_abs_diff_eq;
    assert_abs_diff_eq!(dq.norm(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_normalize() {
    use approx::assert_abs_diff_eq;

    let r = Quaternion::from_axis_angle(nalgebra::Vector3::new(1.0, 0.0, 2.0), 0.4).unwrap();
    let dq = DualQuaternion::from_rot_trans(r, nalgebra::Vector3::new(1.0, 1.0, 1.0)).scale(3.0);
    let unit = dq.normalize().unwrap();
    assert_abs_diff_eq!(unit.norm(), 1.0, epsilon = 1e-12);
    // 两部分同比缩放
    assert_abs_diff_eq!(unit.qd.a, dq.qd.a / 3.0, epsilon = 1e-12);

    let zero = DualQuaternion {
        qr: Quaternion::new(0.0, nalgebra::Vector3::zeros()),
        qd: Quaternion::new(0.0, nalgebra::Vector3::zeros()),
    };
    assert!(matches!(
        zero.normalize(),
        Err(AlgebraError::ZeroNorm { .. })
    ));
}

#[test]
fn test_add_and_scalar_ops() {
    let a = DualQuaternion::from_vector(nalgebra::Vector3::new(1.0, 0.0, 0.0));
    let b = DualQuaternion::from_vector(nalgebra::Vector3::new(0.0, 1.0, 0.0));

    let sum = DualQuaternion::add(&a, &b);
    assert_eq!(sum.qr.a, 2.0);
    assert_eq!(sum.qd.v, nalgebra::Vector3::new(1.0, 1.0, 0.0));

    let doubled = a.multiply(2.0);
    assert_eq!(doubled.qr.a, 2.0);
    let halved = doubled / 2.0;
    assert_eq!(halved, a);
}

#[test]
fn test_right_multiply() {
    let dq = DualQuaternion::identity();
    assert!(dq.right_multiply(2.0).is_ok());

    let err = dq.right_multiply(DualQuaternion::identity()).unwrap_err();
    assert!(matches!(
        err,
        AlgebraError::RightMultiply {
            target: "DualQuaternion",
            ..
        }
    ));
}
