// ==========================================
// 停车场管理系统 - 引擎层
// ==========================================
// 职责: 车位库存、计费策略、事件通知、停车管理器
// 红线: 引擎不做 IO, 时间只从 Clock 获取
// ==========================================

pub mod clock;
pub mod events;
pub mod inventory;
pub mod manager;
pub mod observers;
pub mod strategy;

// 重导出核心引擎
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{ObserverId, ObserverRegistry, ParkingEventObserver, ParkingEventType};
pub use inventory::SpaceInventory;
pub use manager::{ParkingManager, DEFAULT_TICKET_PREFIX, DEFAULT_TICKET_START};
pub use observers::{
    AvailabilityCallback, AvailabilityNotifier, ChargingSessionRecord, ChargingStationObserver,
    LoggingObserver,
};
pub use strategy::{
    BasicPricing, EvChargingPricing, PeakHourPricing, PricingStrategy, PricingStrategyKind,
    RateTable, SubscriptionPricing,
};
