/// 单位范数容差
/// `to_rot_trans` 要求 `|norm(qr) - 1| < EPS`
pub const EPS: f64 = 1e-5;
