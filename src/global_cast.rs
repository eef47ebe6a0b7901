//! 全局类型转换
//!
//! 用于将本库类型与生态类型互相转换，并实现打印。

use std::fmt::Display;

use crate::dual_quaternion::DualQuaternion;
use crate::quaternion::Quaternion;

/// 实现 Display trait 用于打印
impl Display for Quaternion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} + {}i + {}j + {}k",
            self.a, self.v.x, self.v.y, self.v.z
        )
    }
}

impl Display for DualQuaternion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) + e({})", self.qr, self.qd)
    }
}

/// 分量顺序 [a, x, y, z]
impl From<[f64; 4]> for Quaternion {
    fn from(data: [f64; 4]) -> Self {
        Quaternion::new(data[0], nalgebra::Vector3::new(data[1], data[2], data[3]))
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(q: Quaternion) -> Self {
        [q.a, q.v.x, q.v.y, q.v.z]
    }
}

/// 将 [nalgebra::UnitQuaternion] 转换为 [Quaternion]
///
/// 只做分量映射（w -> a, ijk -> v），乘法约定以本库为准。
impl From<nalgebra::UnitQuaternion<f64>> for Quaternion {
    fn from(q: nalgebra::UnitQuaternion<f64>) -> Self {
        Quaternion::new(q.w, q.imag())
    }
}

#[test]
fn test_array_cast() {
    let q = Quaternion::from([1.0, 2.0, 3.0, 4.0]);
    assert_eq!(q.a, 1.0);
    assert_eq!(q.v, nalgebra::Vector3::new(2.0, 3.0, 4.0));

    let data: [f64; 4] = q.into();
    assert_eq!(data, [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_from_unit_quaternion() {
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    let axis = nalgebra::Vector3::new(0.0, 1.0, 0.0);
    let uq = nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Unit::new_normalize(axis), PI / 2.0);
    let q: Quaternion = uq.into();

    let ours = Quaternion::from_axis_angle(axis, PI / 2.0).unwrap();
    assert_abs_diff_eq!(q.a, ours.a, epsilon = 1e-12);
    assert_abs_diff_eq!(q.v, ours.v, epsilon = 1e-12);
}

#[test]
fn test_display() {
    let q = Quaternion::from([0.5, 1.0, 0.0, -1.0]);
    println!("q = {}", q);

    let dq = DualQuaternion::from_rot_trans(q, nalgebra::Vector3::new(1.0, 2.0, 3.0));
    println!("dq = {}", dq);
}

#[test]
fn test_serde_round_trip() {
    use std::f64::consts::PI;

    let r = Quaternion::from_axis_angle(nalgebra::Vector3::new(0.0, 1.0, 0.0), PI / 3.0).unwrap();
    let dq = DualQuaternion::from_rot_trans(r, nalgebra::Vector3::new(4.0, 5.0, 6.0));

    let json = serde_json::to_string(&dq).unwrap();
    let back: DualQuaternion = serde_json::from_str(&json).unwrap();
    assert_eq!(dq, back);
}
