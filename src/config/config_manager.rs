// ==========================================
// 停车场管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照
// 存储: 内存键值表 (key → 字符串值, 部分值为 JSON)
// 来源: JSON 对象文件 / JSON 字符串 / 默认值
// ==========================================

use crate::config::config_reader::LotConfigReader;
use crate::config::lot_layout::LotLayout;
use crate::domain::vehicle::DEFAULT_LOW_BATTERY_THRESHOLD_PCT;
use crate::engine::manager::{DEFAULT_TICKET_PREFIX, DEFAULT_TICKET_START};
use crate::engine::strategy::PricingStrategyKind;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "PARKING_LOT_CONFIG";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 对象字符串加载
    ///
    /// 字符串值原样保存, 其他 JSON 值保存为其 JSON 文本
    /// (例如 `lot_layout` 数组、`ticket_id_start` 数字)
    pub fn from_json_str(raw: &str) -> Result<Self, Box<dyn Error>> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(raw)?;

        let values = object
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        Ok(Self { values })
    }

    /// 从配置文件加载
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("读取配置文件失败: {}: {}", path.display(), e))?;
        let manager = Self::from_json_str(&raw)?;
        tracing::info!(
            "已加载配置文件: {}, keys={}",
            path.display(),
            manager.values.len()
        );
        Ok(manager)
    }

    /// 从配置文件加载, 文件不存在时使用默认配置
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("配置文件不存在, 使用默认配置: {}", path.display());
            return Ok(Self::new());
        }
        Self::from_file(path)
    }

    /// 读取配置值
    fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Option<String> {
        self.get_config_value(key).map(str::to_string)
    }

    /// 覆写配置值
    pub fn set_config_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 读取并解析配置值, 缺失时返回默认值, 格式错误时告警并返回默认值
    fn parse_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    "配置值格式错误，使用默认值: {}",
                    e
                );
                default
            }),
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 返回
    /// - Ok(String): 配置快照的JSON字符串（键有序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string(&self.values)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖同名配置, 快照外的配置保持不变
    pub fn restore_config_from_snapshot(&mut self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;
        let count = config_map.len();
        self.values.extend(config_map);
        Ok(count)
    }
}

// ==========================================
// LotConfigReader Trait 实现
// ==========================================
impl LotConfigReader for ConfigManager {
    fn get_pricing_strategy(&self) -> Result<PricingStrategyKind, Box<dyn Error>> {
        Ok(self.parse_or_default(config_keys::PRICING_STRATEGY, PricingStrategyKind::default()))
    }

    fn get_ticket_id_prefix(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::TICKET_ID_PREFIX)
            .unwrap_or(DEFAULT_TICKET_PREFIX)
            .to_string())
    }

    fn get_ticket_id_start(&self) -> Result<u64, Box<dyn Error>> {
        Ok(self.parse_or_default(config_keys::TICKET_ID_START, DEFAULT_TICKET_START))
    }

    fn get_low_battery_threshold_pct(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.parse_or_default(
            config_keys::LOW_BATTERY_THRESHOLD_PCT,
            DEFAULT_LOW_BATTERY_THRESHOLD_PCT,
        ))
    }

    fn get_lot_layout(&self) -> Result<LotLayout, Box<dyn Error>> {
        match self.get_config_value(config_keys::LOT_LAYOUT) {
            None => Ok(LotLayout::default()),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| format!("车位布局配置格式错误: {}", e).into()),
        }
    }
}

// ==========================================
// 默认配置路径
// ==========================================

/// 获取默认配置文件路径
///
/// # 返回
/// - 环境变量 PARKING_LOT_CONFIG（非空时）
/// - 用户配置目录/parking-lot-manager/parking_lot.json
/// - 回退: ./parking_lot.json
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(config_dir) => config_dir.join("parking-lot-manager").join("parking_lot.json"),
        None => PathBuf::from("./parking_lot.json"),
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 计费
    pub const PRICING_STRATEGY: &str = "pricing_strategy";

    // 票据编号
    pub const TICKET_ID_PREFIX: &str = "ticket_id_prefix";
    pub const TICKET_ID_START: &str = "ticket_id_start";

    // 充电
    pub const LOW_BATTERY_THRESHOLD_PCT: &str = "low_battery_threshold_pct";

    // 车位布局 (JSON)
    pub const LOT_LAYOUT: &str = "lot_layout";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SpaceSize;

    #[test]
    fn test_defaults_when_empty() {
        let config = ConfigManager::new();
        assert_eq!(config.get_pricing_strategy().unwrap(), PricingStrategyKind::Basic);
        assert_eq!(config.get_ticket_id_prefix().unwrap(), "TKT");
        assert_eq!(config.get_ticket_id_start().unwrap(), 1000);
        assert_eq!(config.get_low_battery_threshold_pct().unwrap(), 20.0);
        assert!(config.get_lot_layout().unwrap().is_empty());
    }

    #[test]
    fn test_from_json_keeps_non_string_values_as_json() {
        let config = ConfigManager::from_json_str(
            r#"{
                "pricing_strategy": "peak_hour",
                "ticket_id_start": 1,
                "lot_layout": [{"space_id": "C1", "size": "COMPACT"}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.get_pricing_strategy().unwrap(), PricingStrategyKind::PeakHour);
        assert_eq!(config.get_ticket_id_start().unwrap(), 1);
        let layout = config.get_lot_layout().unwrap();
        assert_eq!(layout.spaces[0].size, SpaceSize::Compact);
    }

    #[test]
    fn test_malformed_scalars_fall_back() {
        let mut config = ConfigManager::new();
        config.set_config_value(config_keys::PRICING_STRATEGY, "flat_rate");
        config.set_config_value(config_keys::TICKET_ID_START, "abc");
        assert_eq!(config.get_pricing_strategy().unwrap(), PricingStrategyKind::Basic);
        assert_eq!(config.get_ticket_id_start().unwrap(), 1000);
    }

    #[test]
    fn test_malformed_layout_is_error() {
        let mut config = ConfigManager::new();
        config.set_config_value(config_keys::LOT_LAYOUT, "{not json");
        assert!(config.get_lot_layout().is_err());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut config = ConfigManager::new();
        config.set_config_value(config_keys::TICKET_ID_PREFIX, "P-");
        let snapshot = config.get_config_snapshot().unwrap();

        let mut restored = ConfigManager::new();
        restored.set_config_value(config_keys::TICKET_ID_START, "5");
        assert_eq!(restored.restore_config_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(restored.get_ticket_id_prefix().unwrap(), "P-");
        assert_eq!(restored.get_ticket_id_start().unwrap(), 5);
    }
}
