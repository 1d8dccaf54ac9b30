// ==========================================
// 停车场管理系统 - 车位库存
// ==========================================
// 职责: 车位登记、空位查询、首个匹配分配、占用率统计
// 顺序: 保持登记顺序 (首个匹配即按此顺序)
// ==========================================

use crate::domain::space::ParkingSpace;
use crate::domain::types::{SpaceSize, SpaceStatus};
use crate::error::{ParkingError, ParkingResult};
use std::collections::HashMap;

// ==========================================
// SpaceInventory - 车位库存
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SpaceInventory {
    spaces: Vec<ParkingSpace>,
    index: HashMap<String, usize>, // space_id → spaces 下标
}

impl SpaceInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记车位（保留传入状态）
    ///
    /// # 错误
    /// - `Validation`: 字段非法, 或以 OCCUPIED 状态登记（占用只能由入场产生）
    /// - `DuplicateId`: space_id 已存在
    pub fn add(&mut self, space: ParkingSpace) -> ParkingResult<()> {
        space.validate()?;
        if space.is_occupied() {
            return Err(ParkingError::validation(format!(
                "车位不能以占用状态登记: {}",
                space.space_id
            )));
        }
        if self.index.contains_key(&space.space_id) {
            return Err(ParkingError::DuplicateId(space.space_id));
        }
        self.index.insert(space.space_id.clone(), self.spaces.len());
        self.spaces.push(space);
        Ok(())
    }

    pub fn get(&self, space_id: &str) -> Option<&ParkingSpace> {
        self.index.get(space_id).map(|&i| &self.spaces[i])
    }

    /// 全部车位（登记顺序）
    pub fn all(&self) -> &[ParkingSpace] {
        &self.spaces
    }

    /// 空闲车位（登记顺序, 可按尺寸过滤）
    pub fn list_available(&self, size: Option<SpaceSize>) -> Vec<&ParkingSpace> {
        self.spaces
            .iter()
            .filter(|s| s.is_available())
            .filter(|s| size.map_or(true, |size| s.size == size))
            .collect()
    }

    pub fn available_count(&self, size: Option<SpaceSize>) -> usize {
        self.list_available(size).len()
    }

    /// 首个匹配尺寸的空闲车位编号
    pub fn first_available(&self, size: SpaceSize) -> Option<&str> {
        self.spaces
            .iter()
            .find(|s| s.is_available() && s.size == size)
            .map(|s| s.space_id.as_str())
    }

    /// 修改车位状态, 返回修改后的车位快照
    pub fn set_status(&mut self, space_id: &str, status: SpaceStatus) -> ParkingResult<ParkingSpace> {
        let i = *self
            .index
            .get(space_id)
            .ok_or_else(|| ParkingError::SpaceNotFound(space_id.to_string()))?;
        let space = &mut self.spaces[i];
        space.status = status;
        Ok(space.clone())
    }

    pub fn total_count(&self) -> usize {
        self.spaces.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.spaces.iter().filter(|s| s.is_occupied()).count()
    }

    /// 占用率 (%), 无车位时为 0.0
    pub fn occupancy_rate(&self) -> f64 {
        if self.spaces.is_empty() {
            return 0.0;
        }
        self.occupied_count() as f64 / self.spaces.len() as f64 * 100.0
    }
}
