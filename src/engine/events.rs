// ==========================================
// 停车场管理系统 - 事件观察者
// ==========================================
// 职责: 定义停车事件观察者 trait
// 事件: 入场 / 出场 / 车位释放
// 通知: 同步、按挂载顺序逐个调用
// 容错: 钩子无返回值, 故障隔离由各观察者自行负责
// ==========================================

use crate::domain::space::ParkingSpace;
use crate::domain::ticket::ParkingTicket;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

// ==========================================
// 事件类型
// ==========================================

/// 停车事件类型（日志与统计用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParkingEventType {
    /// 车辆入场
    VehicleEntry,
    /// 车辆出场
    VehicleExit,
    /// 车位释放
    SpaceAvailable,
}

impl ParkingEventType {
    pub fn as_str(&self) -> &str {
        match self {
            ParkingEventType::VehicleEntry => "VehicleEntry",
            ParkingEventType::VehicleExit => "VehicleExit",
            ParkingEventType::SpaceAvailable => "SpaceAvailable",
        }
    }
}

// ==========================================
// 观察者 Trait
// ==========================================

/// 停车事件观察者
///
/// 三个钩子默认均为空操作, 实现方只覆盖关心的事件。
/// 观察者通过 `Arc` 共享, 可变状态需使用内部可变性。
pub trait ParkingEventObserver: Send + Sync {
    /// 车辆入场（票据已登记为在场）
    fn on_vehicle_entry(&self, _ticket: &ParkingTicket) {}

    /// 车辆出场（票据已写入出场时间与费用）
    fn on_vehicle_exit(&self, _ticket: &ParkingTicket) {}

    /// 车位变为空闲
    fn on_space_available(&self, _space: &ParkingSpace) {}
}

// ==========================================
// ObserverId - 观察者句柄
// ==========================================

/// 挂载观察者时返回的句柄, 用于摘除
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// ObserverRegistry - 有序观察者列表
// ==========================================
// 挂载顺序 = 通知顺序
// 同一实例重复挂载返回已有句柄; 摘除不存在的句柄为空操作
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverId, Arc<dyn ParkingEventObserver>)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 挂载观察者
    pub fn attach(&mut self, observer: Arc<dyn ParkingEventObserver>) -> ObserverId {
        if let Some((id, _)) = self
            .observers
            .iter()
            .find(|(_, existing)| same_instance(existing, &observer))
        {
            tracing::debug!("观察者已挂载, 返回已有句柄: id={}", id);
            return *id;
        }

        let id = ObserverId::new();
        self.observers.push((id, observer));
        tracing::debug!("观察者已挂载: id={}, count={}", id, self.observers.len());
        id
    }

    /// 摘除观察者
    ///
    /// # 返回
    /// - `true`: 已摘除
    /// - `false`: 句柄不存在
    pub fn detach(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        let removed = self.observers.len() != before;
        tracing::debug!("摘除观察者: id={}, removed={}", id, removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify_entry(&self, ticket: &ParkingTicket) {
        self.trace_fan_out(ParkingEventType::VehicleEntry);
        for (_, observer) in &self.observers {
            observer.on_vehicle_entry(ticket);
        }
    }

    pub fn notify_exit(&self, ticket: &ParkingTicket) {
        self.trace_fan_out(ParkingEventType::VehicleExit);
        for (_, observer) in &self.observers {
            observer.on_vehicle_exit(ticket);
        }
    }

    pub fn notify_space_available(&self, space: &ParkingSpace) {
        self.trace_fan_out(ParkingEventType::SpaceAvailable);
        for (_, observer) in &self.observers {
            observer.on_space_available(space);
        }
    }

    fn trace_fan_out(&self, event_type: ParkingEventType) {
        tracing::trace!(
            "通知观察者: event_type={}, observers={}",
            event_type.as_str(),
            self.observers.len()
        );
    }
}

/// 比较数据指针, 忽略 vtable
fn same_instance(a: &Arc<dyn ParkingEventObserver>, b: &Arc<dyn ParkingEventObserver>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
