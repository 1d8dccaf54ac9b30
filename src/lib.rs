// ==========================================
// 停车场管理系统 - 核心库
// ==========================================
// 系统定位: 内存停车场管理 (车位分配 + 计费 + 事件通知)
// 分层: domain → engine → config
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 车辆、车位、票据
pub mod domain;

// 引擎层 - 库存、计费策略、观察者、管理器
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{SpaceSize, SpaceStatus, VehicleCategory};

// 领域实体
pub use domain::{
    ChargingCapability, ParkingSpace, ParkingSummary, ParkingTicket, Vehicle, VehicleFactory,
    VehicleSpecification,
};

// 引擎
pub use engine::{
    AvailabilityNotifier, BasicPricing, ChargingStationObserver, Clock, EvChargingPricing,
    LoggingObserver, ManualClock, ObserverId, ParkingEventObserver, ParkingManager,
    PeakHourPricing, PricingStrategy, PricingStrategyKind, SubscriptionPricing, SystemClock,
};

// 配置
pub use config::{ConfigManager, LotConfigReader, LotLayout};

// 错误
pub use error::{ParkingError, ParkingResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "停车场管理系统";
