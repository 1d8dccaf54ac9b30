// ==========================================
// 停车场管理系统 - 内置观察者
// ==========================================
// LoggingObserver: 通过 tracing 输出事件描述
// ChargingStationObserver: 跟踪电动车充电会话
// AvailabilityNotifier: 车位释放时回调订阅者 (逐个隔离失败)
// ==========================================

use crate::domain::space::ParkingSpace;
use crate::domain::ticket::ParkingTicket;
use crate::domain::vehicle::DEFAULT_LOW_BATTERY_THRESHOLD_PCT;
use crate::engine::events::ParkingEventObserver;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// 获取锁; 观察者状态只做简单插入/删除, 中毒后继续使用
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ==========================================
// LoggingObserver - 事件日志
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl ParkingEventObserver for LoggingObserver {
    fn on_vehicle_entry(&self, ticket: &ParkingTicket) {
        tracing::info!(
            target: "parking_lot_manager::events",
            ticket_id = %ticket.ticket_id,
            "车辆入场: {}",
            ticket
        );
    }

    fn on_vehicle_exit(&self, ticket: &ParkingTicket) {
        tracing::info!(
            target: "parking_lot_manager::events",
            ticket_id = %ticket.ticket_id,
            "车辆出场: {}, 费用: {:.2}",
            ticket.vehicle.registration(),
            ticket.charge_amount
        );
    }

    fn on_space_available(&self, space: &ParkingSpace) {
        tracing::info!(
            target: "parking_lot_manager::events",
            space_id = %space.space_id,
            "车位空闲: {}",
            space
        );
    }
}

// ==========================================
// ChargingStationObserver - 充电会话跟踪
// ==========================================

/// 已结束的充电会话
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingSessionRecord {
    pub registration: String,         // 车牌号
    pub ticket_id: String,            // 票据编号
    pub closing_charge_percentage: f64, // 结束时电量 (%)
    pub low_battery: bool,            // 结束时是否低于低电量阈值
}

/// 充电站观察者
///
/// 入场时若车辆具备充电能力则开启会话（以车牌号为键）,
/// 出场时结束会话并记录结束电量百分比。
#[derive(Debug)]
pub struct ChargingStationObserver {
    low_battery_threshold_pct: f64,
    sessions: Mutex<HashMap<String, String>>, // registration → ticket_id
    closed: Mutex<Vec<ChargingSessionRecord>>,
}

impl ChargingStationObserver {
    pub fn new() -> Self {
        Self::with_low_battery_threshold(DEFAULT_LOW_BATTERY_THRESHOLD_PCT)
    }

    /// 指定低电量阈值 (%)
    pub fn with_low_battery_threshold(threshold_pct: f64) -> Self {
        Self {
            low_battery_threshold_pct: threshold_pct,
            sessions: Mutex::new(HashMap::new()),
            closed: Mutex::new(Vec::new()),
        }
    }

    pub fn active_session_count(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn has_active_session(&self, registration: &str) -> bool {
        lock(&self.sessions).contains_key(registration)
    }

    /// 已结束会话（按结束顺序）
    pub fn closed_sessions(&self) -> Vec<ChargingSessionRecord> {
        lock(&self.closed).clone()
    }
}

impl Default for ChargingStationObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ParkingEventObserver for ChargingStationObserver {
    fn on_vehicle_entry(&self, ticket: &ParkingTicket) {
        if !ticket.vehicle.has_charging() {
            return;
        }
        let registration = ticket.vehicle.registration().to_string();
        tracing::info!("充电会话开始: registration={}", registration);
        lock(&self.sessions).insert(registration, ticket.ticket_id.clone());
    }

    fn on_vehicle_exit(&self, ticket: &ParkingTicket) {
        let registration = ticket.vehicle.registration();
        let Some(ticket_id) = lock(&self.sessions).remove(registration) else {
            return;
        };

        let (percentage, low_battery) = match ticket.vehicle.charging() {
            Some(c) => (
                c.charge_percentage(),
                c.is_low_battery(self.low_battery_threshold_pct),
            ),
            None => (0.0, true),
        };
        tracing::info!(
            "充电会话结束: registration={}, 结束电量={:.1}%",
            registration,
            percentage
        );
        if low_battery {
            tracing::warn!(
                "车辆离场时电量偏低: registration={}, 电量={:.1}%, 阈值={:.1}%",
                registration,
                percentage,
                self.low_battery_threshold_pct
            );
        }

        lock(&self.closed).push(ChargingSessionRecord {
            registration: registration.to_string(),
            ticket_id,
            closing_charge_percentage: percentage,
            low_battery,
        });
    }
}

// ==========================================
// AvailabilityNotifier - 空位通知
// ==========================================

/// 空位订阅回调
pub type AvailabilityCallback = Box<dyn Fn(&ParkingSpace) -> anyhow::Result<()> + Send + Sync>;

/// 空位通知观察者
///
/// 车位释放时按订阅顺序调用所有回调; 单个回调失败只记录日志,
/// 不影响其余回调, 也不向管理器传播。
#[derive(Default)]
pub struct AvailabilityNotifier {
    subscribers: Mutex<Vec<AvailabilityCallback>>,
}

impl AvailabilityNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅空位通知
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&ParkingSpace) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        lock(&self.subscribers).push(Box::new(callback));
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// 通知所有订阅者
    ///
    /// # 返回
    /// 失败的回调数量
    pub fn notify(&self, space: &ParkingSpace) -> usize {
        let subscribers = lock(&self.subscribers);
        let mut failed = 0;
        for (index, callback) in subscribers.iter().enumerate() {
            if let Err(e) = callback(space) {
                failed += 1;
                tracing::error!(
                    "空位通知回调失败: subscriber={}, space_id={}, error={:#}",
                    index,
                    space.space_id,
                    e
                );
            }
        }
        failed
    }
}

impl ParkingEventObserver for AvailabilityNotifier {
    fn on_space_available(&self, space: &ParkingSpace) {
        tracing::debug!("空位通知: {}", space);
        self.notify(space);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SpaceSize;
    use crate::domain::vehicle::{Vehicle, VehicleSpecification};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn ticket(vehicle: Vehicle) -> ParkingTicket {
        let space = ParkingSpace::new("S1", SpaceSize::Standard).unwrap();
        let entry = NaiveDate::from_ymd_opt(2026, 1, 17)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        ParkingTicket::new("TKT1000".to_string(), vehicle, space, entry)
    }

    fn spec(reg: &str) -> VehicleSpecification {
        VehicleSpecification::new(reg, "Tesla", "Model 3", "White").unwrap()
    }

    #[test]
    fn test_charging_observer_tracks_only_evs() {
        let observer = ChargingStationObserver::new();

        observer.on_vehicle_entry(&ticket(Vehicle::car(spec("CAR1"))));
        assert_eq!(observer.active_session_count(), 0);

        let mut ev = Vehicle::car(spec("EV1")).with_charging(80.0).unwrap();
        ev.charging_mut().unwrap().charge(20.0).unwrap();
        let t = ticket(ev);
        observer.on_vehicle_entry(&t);
        assert!(observer.has_active_session("EV1"));

        observer.on_vehicle_exit(&t);
        assert_eq!(observer.active_session_count(), 0);
        assert_eq!(
            observer.closed_sessions(),
            vec![ChargingSessionRecord {
                registration: "EV1".to_string(),
                ticket_id: "TKT1000".to_string(),
                closing_charge_percentage: 25.0,
                low_battery: false,
            }]
        );
    }

    #[test]
    fn test_charging_observer_flags_low_battery() {
        let observer = ChargingStationObserver::with_low_battery_threshold(50.0);
        let mut ev = Vehicle::car(spec("EV2")).with_charging(100.0).unwrap();
        ev.charging_mut().unwrap().charge(30.0).unwrap();
        let t = ticket(ev);

        observer.on_vehicle_entry(&t);
        observer.on_vehicle_exit(&t);
        assert!(observer.closed_sessions()[0].low_battery);
    }

    #[test]
    fn test_charging_observer_ignores_unknown_exit() {
        let observer = ChargingStationObserver::new();
        let ev = Vehicle::car(spec("EV1")).with_charging(80.0).unwrap();
        observer.on_vehicle_exit(&ticket(ev));
        assert!(observer.closed_sessions().is_empty());
    }

    #[test]
    fn test_availability_notifier_isolates_failures() {
        let notifier = AvailabilityNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        notifier.subscribe(move |space| {
            first.lock().unwrap().push(format!("first:{}", space.space_id));
            Ok(())
        });
        notifier.subscribe(|_| anyhow::bail!("subscriber offline"));
        let third = seen.clone();
        notifier.subscribe(move |space| {
            third.lock().unwrap().push(format!("third:{}", space.space_id));
            Ok(())
        });

        let space = ParkingSpace::new("C1", SpaceSize::Compact).unwrap();
        assert_eq!(notifier.notify(&space), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["first:C1", "third:C1"]);

        // 作为观察者调用时同样不会中断
        notifier.on_space_available(&space);
        assert_eq!(seen.lock().unwrap().len(), 4);
        assert_eq!(notifier.subscriber_count(), 3);
    }
}
