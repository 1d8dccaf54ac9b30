// ==========================================
// 停车场管理系统 - 领域模型层
// ==========================================
// 职责: 定义车辆、车位、票据等值对象与实体
// 红线: 不含分配逻辑, 不含计费逻辑
// ==========================================

pub mod space;
pub mod summary;
pub mod ticket;
pub mod types;
pub mod vehicle;
pub mod vehicle_factory;

// 重导出核心类型
pub use space::ParkingSpace;
pub use summary::ParkingSummary;
pub use ticket::ParkingTicket;
pub use types::{SpaceSize, SpaceStatus, VehicleCategory};
pub use vehicle::{
    ChargingCapability, Vehicle, VehicleSpecification, DEFAULT_LOW_BATTERY_THRESHOLD_PCT,
};
pub use vehicle_factory::{VehicleConstructor, VehicleFactory};
