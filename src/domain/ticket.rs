// ==========================================
// 停车场管理系统 - 停车票据
// ==========================================
// 生命周期: 入场创建 → 出场时写入 exit_time 与 charge_amount → 归档
// 不变量: exit_time 为空 ⇔ 票据在场 (active)
// ==========================================

use crate::domain::space::ParkingSpace;
use crate::domain::vehicle::Vehicle;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ParkingTicket - 停车票据
// ==========================================
// 只由 ParkingManager 签发与结算; 字段公开供读取, 外部不应修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingTicket {
    pub ticket_id: String,                // 票据编号 (单调分配)
    pub vehicle: Vehicle,                 // 车辆
    pub space: ParkingSpace,              // 分配车位 (入场时快照, 出场时同步状态)
    pub entry_time: NaiveDateTime,        // 入场时间 (本地时间)
    pub exit_time: Option<NaiveDateTime>, // 出场时间 (null表示在场)
    pub charge_amount: f64,               // 费用 (出场时计算一次)
}

impl ParkingTicket {
    pub fn new(
        ticket_id: String,
        vehicle: Vehicle,
        space: ParkingSpace,
        entry_time: NaiveDateTime,
    ) -> Self {
        Self {
            ticket_id,
            vehicle,
            space,
            entry_time,
            exit_time: None,
            charge_amount: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.exit_time.is_none()
    }

    /// 停车时长（小时）
    ///
    /// 已出场: entry_time → exit_time; 在场: 返回 0
    pub fn duration_hours(&self) -> f64 {
        match self.exit_time {
            Some(exit_time) => hours_between(self.entry_time, exit_time),
            None => 0.0,
        }
    }

    /// 截至指定时刻的停车时长（小时）
    ///
    /// 已出场的票据忽略 `now`, 仍以 exit_time 为终点
    pub fn duration_hours_at(&self, now: NaiveDateTime) -> f64 {
        hours_between(self.entry_time, self.exit_time.unwrap_or(now))
    }
}

/// 两时刻之间的小时数, 时钟回拨时取 0
fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
    (seconds / 3600.0).max(0.0)
}

impl fmt::Display for ParkingTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_active() { "ACTIVE" } else { "COMPLETED" };
        write!(
            f,
            "Ticket {}: {} in {} [{}]",
            self.ticket_id,
            self.vehicle.registration(),
            self.space,
            status
        )
    }
}
