use thiserror::Error;

/// 乘法操作数：标量或者同类型
///
/// 代数运算的多态分发，穷举处理所有情况。
#[derive(Debug, Clone, Copy)]
pub enum Operand<T> {
    Scalar(f64),
    Value(T),
}

/// 代数运算错误
#[derive(Error, Debug)]
pub enum AlgebraError {
    /// 右乘只支持标量
    #[error("Tried to right-multiply {target} by {operand}")]
    RightMultiply {
        target: &'static str,
        operand: &'static str,
    },
    /// 实部未归一化
    #[error("Qr is not normalized! ||Qr|| = {norm}")]
    NotNormalized { norm: f64 },
    /// 除零：范数为零
    #[error("division by zero: {context} has zero norm")]
    ZeroNorm { context: &'static str },
}
