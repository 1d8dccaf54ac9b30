// ==========================================
// 停车场管理系统 - 配置读取 Trait
// ==========================================
// 职责: 定义停车管理器初始化所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::lot_layout::LotLayout;
use crate::engine::strategy::PricingStrategyKind;
use std::error::Error;

// ==========================================
// LotConfigReader Trait
// ==========================================
// 用途: ParkingManager::from_config 的配置来源
// 实现者: ConfigManager（键值配置）
pub trait LotConfigReader {
    /// 获取初始计费策略
    ///
    /// # 默认值
    /// - basic
    fn get_pricing_strategy(&self) -> Result<PricingStrategyKind, Box<dyn Error>>;

    /// 获取票据编号前缀
    ///
    /// # 默认值
    /// - "TKT"
    fn get_ticket_id_prefix(&self) -> Result<String, Box<dyn Error>>;

    /// 获取起始票据序号
    ///
    /// # 默认值
    /// - 1000
    fn get_ticket_id_start(&self) -> Result<u64, Box<dyn Error>>;

    /// 获取低电量阈值 (%)
    ///
    /// # 默认值
    /// - 20.0
    fn get_low_battery_threshold_pct(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取车位布局
    ///
    /// # 默认值
    /// - 空布局
    ///
    /// # 错误
    /// - 布局 JSON 格式错误（不回退为空布局）
    fn get_lot_layout(&self) -> Result<LotLayout, Box<dyn Error>>;
}
