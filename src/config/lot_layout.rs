use crate::domain::space::ParkingSpace;
use crate::domain::types::{SpaceSize, SpaceStatus};
use crate::error::ParkingResult;
use serde::{Deserialize, Serialize};

/// 停车场车位布局（配置对象）
///
/// 存储位置：配置键 `lot_layout`，值为 SpaceDefinition 的 JSON 数组
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotLayout {
    pub spaces: Vec<SpaceDefinition>,
}

/// 单个车位定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceDefinition {
    /// 车位编号（唯一）
    pub space_id: String,

    /// 车位尺寸（COMPACT/STANDARD/LARGE）
    pub size: SpaceSize,

    /// 楼层（默认 1）
    #[serde(default = "default_floor")]
    pub floor: u32,

    /// 位置标签（可选）
    #[serde(default)]
    pub location: String,

    /// 初始状态（默认 AVAILABLE，可预置 RESERVED/MAINTENANCE；OCCUPIED 登记时被拒绝）
    #[serde(default)]
    pub status: SpaceStatus,
}

fn default_floor() -> u32 {
    1
}

impl LotLayout {
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// 转换为车位实体（逐个校验）
    pub fn into_spaces(self) -> ParkingResult<Vec<ParkingSpace>> {
        self.spaces
            .into_iter()
            .map(|def| {
                ParkingSpace::with_details(def.space_id, def.size, def.status, def.floor, def.location)
            })
            .collect()
    }
}
