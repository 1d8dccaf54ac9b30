// ==========================================
// 停车场管理系统 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 原则: 先校验后修改, 出错时状态不变
// ==========================================

use crate::domain::types::{SpaceSize, SpaceStatus};
use thiserror::Error;

/// 停车场错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParkingError {
    // ===== 值对象构造错误 =====
    #[error("数据验证失败: {0}")]
    Validation(String),

    // ===== 车位管理错误 =====
    #[error("车位编号重复: {0}")]
    DuplicateId(String),

    #[error("车位不存在: {0}")]
    SpaceNotFound(String),

    #[error("无效的车位状态转换: from={from} to={to}")]
    InvalidStateTransition { from: SpaceStatus, to: SpaceStatus },

    // ===== 入场/出场错误 =====
    #[error("车辆已在场内: {0}")]
    AlreadyParked(String),

    #[error("无可用车位: size={size}, registration={registration}")]
    NoSpaceAvailable {
        size: SpaceSize,
        registration: String,
    },

    #[error("车辆不在场内: {0}")]
    NotParked(String),

    // ===== 车辆构造错误 =====
    #[error("未知车辆类型: {0}")]
    UnknownCategory(String),
}

impl ParkingError {
    /// 构造验证错误的便捷方法
    pub fn validation(message: impl Into<String>) -> Self {
        ParkingError::Validation(message.into())
    }
}

/// Result 类型别名
pub type ParkingResult<T> = Result<T, ParkingError>;
