// ==========================================
// 停车场管理系统 - 车位领域模型
// ==========================================
// 身份: space_id 唯一且非空
// 状态: 由车位库存统一修改
// ==========================================

use crate::domain::types::{SpaceSize, SpaceStatus};
use crate::error::{ParkingError, ParkingResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ParkingSpace - 车位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpace {
    pub space_id: String,   // 车位编号
    pub size: SpaceSize,    // 车位尺寸
    pub status: SpaceStatus, // 当前状态
    pub floor: u32,         // 楼层 (>= 1)
    pub location: String,   // 位置标签, 如 "A3"
}

impl ParkingSpace {
    /// 创建空闲车位（1 楼, 无位置标签）
    pub fn new(space_id: impl Into<String>, size: SpaceSize) -> ParkingResult<Self> {
        Self::with_details(space_id, size, SpaceStatus::Available, 1, "")
    }

    /// 创建车位（完整参数）
    ///
    /// # 错误
    /// - space_id 为空
    /// - floor < 1
    pub fn with_details(
        space_id: impl Into<String>,
        size: SpaceSize,
        status: SpaceStatus,
        floor: u32,
        location: impl Into<String>,
    ) -> ParkingResult<Self> {
        let space = Self {
            space_id: space_id.into(),
            size,
            status,
            floor,
            location: location.into(),
        };
        space.validate()?;
        Ok(space)
    }

    /// 校验车位字段
    ///
    /// 字段为 pub, 直接构造的结构体字面量不经过 `with_details`,
    /// 车位库存登记时会再次调用本方法
    pub fn validate(&self) -> ParkingResult<()> {
        if self.space_id.trim().is_empty() {
            return Err(ParkingError::validation("车位编号不能为空"));
        }
        if self.floor < 1 {
            return Err(ParkingError::validation(format!(
                "楼层必须为正数: space_id={}, floor={}",
                self.space_id, self.floor
            )));
        }
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.status == SpaceStatus::Available
    }

    pub fn is_occupied(&self) -> bool {
        self.status == SpaceStatus::Occupied
    }
}

impl fmt::Display for ParkingSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Space {} (Floor {}, {})", self.space_id, self.floor, self.size)
    }
}
