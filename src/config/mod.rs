// ==========================================
// 停车场管理系统 - 配置层
// ==========================================
// 职责: 系统配置管理, 支持文件加载与覆写
// 存储: 内存键值表, 可快照为 JSON
// ==========================================

pub mod config_manager;
pub mod config_reader;
pub mod lot_layout;

// 重导出核心配置管理器
pub use config_manager::{config_keys, get_default_config_path, ConfigManager, CONFIG_PATH_ENV};
pub use config_reader::LotConfigReader;
pub use lot_layout::{LotLayout, SpaceDefinition};
