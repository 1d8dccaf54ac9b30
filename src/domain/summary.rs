// ==========================================
// 停车场管理系统 - 运营汇总
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ParkingSummary - 停车场汇总记录
// ==========================================
// 用途: 查询接口返回值 / 二进制入口输出 JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSummary {
    pub total_spaces: usize,       // 车位总数
    pub occupied_spaces: usize,    // 占用车位数
    pub available_spaces: usize,   // 未占用车位数 (总数 - 占用, 含预留/维护)
    pub occupancy_rate: f64,       // 占用率 (%)
    pub pricing_strategy: String,  // 当前计费策略名称
    pub total_revenue: f64,        // 累计收入
    pub active_vehicles: usize,    // 在场车辆数
    pub total_transactions: usize, // 已完成交易数
}
