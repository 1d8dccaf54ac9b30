// ==========================================
// 停车场管理系统 - 领域类型定义
// ==========================================
// 车辆类型、车位尺寸、车位状态
// 序列化格式与 Display 输出保持一致
// ==========================================

use crate::error::ParkingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 车辆类型 (Vehicle Category)
// ==========================================
// 固定映射: Motorcycle→COMPACT, Car→STANDARD, Truck/Bus→LARGE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    Car,
    Truck,
    Motorcycle,
    Bus,
}

impl VehicleCategory {
    /// 全部车辆类型（注册表初始化用）
    pub const ALL: [VehicleCategory; 4] = [
        VehicleCategory::Car,
        VehicleCategory::Truck,
        VehicleCategory::Motorcycle,
        VehicleCategory::Bus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "Car",
            VehicleCategory::Truck => "Truck",
            VehicleCategory::Motorcycle => "Motorcycle",
            VehicleCategory::Bus => "Bus",
        }
    }

    /// 该类型车辆所需的车位尺寸
    pub fn required_space_size(&self) -> SpaceSize {
        match self {
            VehicleCategory::Motorcycle => SpaceSize::Compact,
            VehicleCategory::Car => SpaceSize::Standard,
            VehicleCategory::Truck | VehicleCategory::Bus => SpaceSize::Large,
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "car" => Ok(VehicleCategory::Car),
            "truck" => Ok(VehicleCategory::Truck),
            "motorcycle" => Ok(VehicleCategory::Motorcycle),
            "bus" => Ok(VehicleCategory::Bus),
            _ => Err(ParkingError::UnknownCategory(s.to_string())),
        }
    }
}

// ==========================================
// 车位尺寸 (Space Size)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpaceSize {
    Compact,  // 紧凑型
    Standard, // 标准型
    Large,    // 大型
}

impl fmt::Display for SpaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceSize::Compact => write!(f, "COMPACT"),
            SpaceSize::Standard => write!(f, "STANDARD"),
            SpaceSize::Large => write!(f, "LARGE"),
        }
    }
}

impl FromStr for SpaceSize {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COMPACT" => Ok(SpaceSize::Compact),
            "STANDARD" => Ok(SpaceSize::Standard),
            "LARGE" => Ok(SpaceSize::Large),
            other => Err(ParkingError::validation(format!("未知车位尺寸: {}", other))),
        }
    }
}

// ==========================================
// 车位状态 (Space Status)
// ==========================================
// 正常运行: AVAILABLE ↔ OCCUPIED
// RESERVED / MAINTENANCE 仅由人工设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpaceStatus {
    #[default]
    Available,   // 空闲
    Occupied,    // 占用
    Reserved,    // 预留
    Maintenance, // 维护
}

impl fmt::Display for SpaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceStatus::Available => write!(f, "AVAILABLE"),
            SpaceStatus::Occupied => write!(f, "OCCUPIED"),
            SpaceStatus::Reserved => write!(f, "RESERVED"),
            SpaceStatus::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

impl FromStr for SpaceStatus {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AVAILABLE" => Ok(SpaceStatus::Available),
            "OCCUPIED" => Ok(SpaceStatus::Occupied),
            "RESERVED" => Ok(SpaceStatus::Reserved),
            "MAINTENANCE" => Ok(SpaceStatus::Maintenance),
            other => Err(ParkingError::validation(format!("未知车位状态: {}", other))),
        }
    }
}
