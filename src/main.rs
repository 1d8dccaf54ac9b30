// ==========================================
// 停车场管理系统 - 主入口
// ==========================================
// 用法:
//   parking-lot-manager [--json-log] [config_path]
//
// 加载配置 → 按布局建立停车场 → 挂接观察者 → 输出汇总 (JSON)
// ==========================================

use parking_lot_manager::config::{get_default_config_path, ConfigManager, LotConfigReader};
use parking_lot_manager::engine::{
    ChargingStationObserver, LoggingObserver, ParkingManager, SystemClock,
};
use parking_lot_manager::{logging, APP_NAME, VERSION};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut json_log = false;
    let mut config_path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json-log" => json_log = true,
            other => config_path = Some(PathBuf::from(other)),
        }
    }

    if json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{}", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let config_path = config_path.unwrap_or_else(get_default_config_path);
    tracing::info!("使用配置文件: {}", config_path.display());
    let config = ConfigManager::load_or_default(&config_path)?;

    let mut manager = ParkingManager::from_config(&config, Arc::new(SystemClock))?;
    manager.attach_observer(Arc::new(LoggingObserver));
    manager.attach_observer(Arc::new(ChargingStationObserver::with_low_battery_threshold(
        config.get_low_battery_threshold_pct()?,
    )));

    if manager.spaces().is_empty() {
        tracing::warn!("车位布局为空, 请在配置中设置 lot_layout");
    }

    let summary = serde_json::to_string(&manager.summary())?;
    tracing::info!(summary = %summary, "停车场已就绪: 策略={}", manager.current_strategy_name());
    Ok(())
}
