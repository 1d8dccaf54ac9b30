// ==========================================
// 停车场管理系统 - 停车管理器
// ==========================================
// 职责: 车位分配 + 票据管理 + 计费 + 事件通知
// 流程: 入场/出场请求 → 校验 → 修改库存与票据 → 计费 → 通知观察者
// 红线: 每个操作先完成全部校验再修改状态
// 并发: 单调用方同步使用; 多线程访问需由外部加锁
// ==========================================

use crate::config::LotConfigReader;
use crate::domain::space::ParkingSpace;
use crate::domain::summary::ParkingSummary;
use crate::domain::ticket::ParkingTicket;
use crate::domain::types::{SpaceSize, SpaceStatus, VehicleCategory};
use crate::domain::vehicle::Vehicle;
use crate::engine::clock::{Clock, SystemClock};
use crate::engine::events::{ObserverId, ObserverRegistry, ParkingEventObserver};
use crate::engine::inventory::SpaceInventory;
use crate::engine::strategy::PricingStrategy;
use crate::error::{ParkingError, ParkingResult};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::sync::Arc;
use tracing::instrument;

/// 默认票据编号前缀
pub const DEFAULT_TICKET_PREFIX: &str = "TKT";

/// 默认起始票据序号
pub const DEFAULT_TICKET_START: u64 = 1000;

// ==========================================
// ParkingManager - 停车管理器
// ==========================================
pub struct ParkingManager {
    inventory: SpaceInventory,
    active_tickets: HashMap<String, (u64, ParkingTicket)>, // registration → (序号, 票据)
    completed_tickets: Vec<ParkingTicket>,
    observers: ObserverRegistry,
    pricing_strategy: Box<dyn PricingStrategy>,
    clock: Arc<dyn Clock>,
    ticket_prefix: String,
    next_ticket_seq: u64,
}

impl ParkingManager {
    /// 创建管理器（系统时钟）
    ///
    /// # 参数
    /// - pricing_strategy: 初始计费策略
    pub fn new(pricing_strategy: Box<dyn PricingStrategy>) -> Self {
        Self::with_clock(pricing_strategy, Arc::new(SystemClock))
    }

    /// 创建管理器（指定时钟）
    pub fn with_clock(pricing_strategy: Box<dyn PricingStrategy>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inventory: SpaceInventory::new(),
            active_tickets: HashMap::new(),
            completed_tickets: Vec::new(),
            observers: ObserverRegistry::new(),
            pricing_strategy,
            clock,
            ticket_prefix: DEFAULT_TICKET_PREFIX.to_string(),
            next_ticket_seq: DEFAULT_TICKET_START,
        }
    }

    /// 设置票据编号规则（仅影响之后签发的票据）
    pub fn with_ticket_numbering(mut self, prefix: impl Into<String>, start: u64) -> Self {
        self.ticket_prefix = prefix.into();
        self.next_ticket_seq = start;
        self
    }

    /// 按配置创建管理器: 计费策略、票据编号、车位布局
    ///
    /// # 错误
    /// - 配置读取失败
    /// - 布局中车位非法或编号重复
    pub fn from_config<C>(config: &C, clock: Arc<dyn Clock>) -> Result<Self, Box<dyn Error>>
    where
        C: LotConfigReader + ?Sized,
    {
        let strategy_kind = config.get_pricing_strategy()?;
        let prefix = config.get_ticket_id_prefix()?;
        let start = config.get_ticket_id_start()?;
        let layout = config.get_lot_layout()?;

        let mut manager = Self::with_clock(strategy_kind.build(), clock)
            .with_ticket_numbering(prefix, start);
        manager.add_spaces(layout.into_spaces()?)?;

        tracing::info!(
            "停车管理器已按配置初始化: strategy={}, spaces={}",
            manager.current_strategy_name(),
            manager.inventory.total_count()
        );
        Ok(manager)
    }

    // ==========================================
    // 车位管理
    // ==========================================

    /// 登记车位
    ///
    /// # 错误
    /// - `DuplicateId`: 车位编号已存在
    pub fn add_space(&mut self, space: ParkingSpace) -> ParkingResult<()> {
        tracing::debug!("登记车位: {} status={}", space, space.status);
        self.inventory.add(space)
    }

    /// 批量登记车位, 遇到第一个失败即停止（已登记的保留）
    pub fn add_spaces<I>(&mut self, spaces: I) -> ParkingResult<()>
    where
        I: IntoIterator<Item = ParkingSpace>,
    {
        for space in spaces {
            self.add_space(space)?;
        }
        Ok(())
    }

    pub fn space(&self, space_id: &str) -> Option<&ParkingSpace> {
        self.inventory.get(space_id)
    }

    /// 全部车位（登记顺序）
    pub fn spaces(&self) -> &[ParkingSpace] {
        self.inventory.all()
    }

    /// 空闲车位（登记顺序, 可按尺寸过滤）
    pub fn list_available(&self, size: Option<SpaceSize>) -> Vec<&ParkingSpace> {
        self.inventory.list_available(size)
    }

    pub fn available_space_count(&self, size: Option<SpaceSize>) -> usize {
        self.inventory.available_count(size)
    }

    /// 占用率 (%), 无车位时为 0.0
    pub fn occupancy_rate(&self) -> f64 {
        self.inventory.occupancy_rate()
    }

    /// 人工设置车位状态（预留 / 维护 / 恢复空闲）
    ///
    /// # 错误
    /// - `SpaceNotFound`: 车位不存在
    /// - `InvalidStateTransition`: 目标为 OCCUPIED, 或车位当前被占用
    ///
    /// 变为 AVAILABLE 时通知观察者车位释放
    pub fn set_space_status(&mut self, space_id: &str, status: SpaceStatus) -> ParkingResult<()> {
        let current = self
            .inventory
            .get(space_id)
            .ok_or_else(|| ParkingError::SpaceNotFound(space_id.to_string()))?
            .status;

        if status == SpaceStatus::Occupied || current == SpaceStatus::Occupied {
            return Err(ParkingError::InvalidStateTransition {
                from: current,
                to: status,
            });
        }
        if current == status {
            return Ok(());
        }

        let space = self.inventory.set_status(space_id, status)?;
        tracing::info!("车位状态变更: space_id={}, {} → {}", space_id, current, status);

        if status == SpaceStatus::Available {
            self.observers.notify_space_available(&space);
        }
        Ok(())
    }

    // ==========================================
    // 入场 / 出场
    // ==========================================

    /// 车辆入场
    ///
    /// 按登记顺序选取首个匹配尺寸的空闲车位, 签发票据后通知观察者。
    ///
    /// # 错误
    /// - `AlreadyParked`: 该车牌已有在场票据
    /// - `NoSpaceAvailable`: 无匹配尺寸的空闲车位
    /// - `Validation`: 票据序号已达上限
    #[instrument(skip(self, vehicle), fields(registration = %vehicle.registration()))]
    pub fn park(&mut self, vehicle: Vehicle) -> ParkingResult<ParkingTicket> {
        let registration = vehicle.registration().to_string();
        if self.active_tickets.contains_key(&registration) {
            return Err(ParkingError::AlreadyParked(registration));
        }

        let size = vehicle.required_space_size();
        let space_id = self
            .inventory
            .first_available(size)
            .map(str::to_string)
            .ok_or_else(|| ParkingError::NoSpaceAvailable {
                size,
                registration: registration.clone(),
            })?;

        let seq = self.next_ticket_seq;
        let next_seq = seq.checked_add(1).ok_or_else(|| {
            ParkingError::validation(format!("票据序号已耗尽: {}{}", self.ticket_prefix, seq))
        })?;

        // === 校验完成, 开始修改状态 ===
        let space = self.inventory.set_status(&space_id, SpaceStatus::Occupied)?;
        self.next_ticket_seq = next_seq;

        let ticket = ParkingTicket::new(
            format!("{}{}", self.ticket_prefix, seq),
            vehicle,
            space,
            self.clock.now(),
        );
        self.active_tickets
            .insert(registration, (seq, ticket.clone()));

        tracing::info!(
            "车辆入场: ticket_id={}, space_id={}, category={}",
            ticket.ticket_id,
            ticket.space.space_id,
            ticket.vehicle.category()
        );

        self.observers.notify_entry(&ticket);
        Ok(ticket)
    }

    /// 车辆出场
    ///
    /// 写入出场时间, 由当前计费策略计算费用, 释放车位并归档票据,
    /// 然后依次通知观察者出场事件与车位释放事件。
    ///
    /// # 错误
    /// - `NotParked`: 该车牌无在场票据
    #[instrument(skip(self))]
    pub fn retrieve(&mut self, registration: &str) -> ParkingResult<ParkingTicket> {
        let (_, mut ticket) = self
            .active_tickets
            .remove(registration)
            .ok_or_else(|| ParkingError::NotParked(registration.to_string()))?;

        ticket.exit_time = Some(self.clock.now());
        ticket.charge_amount = self.pricing_strategy.calculate_fee(&ticket).max(0.0);

        ticket.space = self
            .inventory
            .set_status(&ticket.space.space_id, SpaceStatus::Available)?;
        self.completed_tickets.push(ticket.clone());

        tracing::info!(
            "车辆出场: ticket_id={}, hours={:.2}, charge={:.2}, strategy={}",
            ticket.ticket_id,
            ticket.duration_hours(),
            ticket.charge_amount,
            self.pricing_strategy.name()
        );

        self.observers.notify_exit(&ticket);
        self.observers.notify_space_available(&ticket.space);
        Ok(ticket)
    }

    /// 按当前策略估算在场车辆此刻出场的费用（不修改状态）
    pub fn quote_fee(&self, registration: &str) -> ParkingResult<f64> {
        let (_, ticket) = self
            .active_tickets
            .get(registration)
            .ok_or_else(|| ParkingError::NotParked(registration.to_string()))?;

        let mut preview = ticket.clone();
        preview.exit_time = Some(self.clock.now());
        Ok(self.pricing_strategy.calculate_fee(&preview).max(0.0))
    }

    /// 为在场电动车充电
    ///
    /// # 返回
    /// 实际充入电量
    ///
    /// # 错误
    /// - `NotParked`: 车辆不在场
    /// - `Validation`: 车辆无充电能力或充电量为负
    pub fn charge_vehicle(&mut self, registration: &str, amount_kwh: f64) -> ParkingResult<f64> {
        let (_, ticket) = self
            .active_tickets
            .get_mut(registration)
            .ok_or_else(|| ParkingError::NotParked(registration.to_string()))?;

        let charging = ticket.vehicle.charging_mut().ok_or_else(|| {
            ParkingError::validation(format!("车辆无充电能力: {}", registration))
        })?;
        let charged = charging.charge(amount_kwh)?;
        tracing::debug!(
            "在场充电: registration={}, charged={:.1}kWh, level={:.1}%",
            registration,
            charged,
            charging.charge_percentage()
        );
        Ok(charged)
    }

    // ==========================================
    // 计费策略
    // ==========================================

    /// 替换计费策略（只影响之后出场的票据）
    pub fn set_pricing_strategy(&mut self, strategy: Box<dyn PricingStrategy>) {
        tracing::info!(
            "切换计费策略: {} → {}",
            self.pricing_strategy.name(),
            strategy.name()
        );
        self.pricing_strategy = strategy;
    }

    pub fn current_strategy_name(&self) -> &str {
        self.pricing_strategy.name()
    }

    // ==========================================
    // 观察者管理
    // ==========================================

    /// 挂载观察者; 同一实例重复挂载返回原句柄
    pub fn attach_observer(&mut self, observer: Arc<dyn ParkingEventObserver>) -> ObserverId {
        self.observers.attach(observer)
    }

    /// 摘除观察者; 句柄不存在时返回 false
    pub fn detach_observer(&mut self, id: ObserverId) -> bool {
        self.observers.detach(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ==========================================
    // 查询与报表
    // ==========================================

    /// 在场车辆（按入场顺序）
    pub fn parked_vehicles(&self) -> Vec<&Vehicle> {
        let mut active: Vec<&(u64, ParkingTicket)> = self.active_tickets.values().collect();
        active.sort_by_key(|(seq, _)| *seq);
        active.into_iter().map(|(_, ticket)| &ticket.vehicle).collect()
    }

    pub fn active_ticket(&self, registration: &str) -> Option<&ParkingTicket> {
        self.active_tickets.get(registration).map(|(_, ticket)| ticket)
    }

    pub fn is_parked(&self, registration: &str) -> bool {
        self.active_tickets.contains_key(registration)
    }

    /// 已完成票据（出场顺序）
    pub fn completed_tickets(&self) -> &[ParkingTicket] {
        &self.completed_tickets
    }

    /// 累计收入
    pub fn total_revenue(&self) -> f64 {
        self.completed_tickets.iter().map(|t| t.charge_amount).sum()
    }

    /// 按车辆类型统计收入
    pub fn revenue_by_category(&self) -> BTreeMap<VehicleCategory, f64> {
        let mut revenue = BTreeMap::new();
        for ticket in &self.completed_tickets {
            *revenue.entry(ticket.vehicle.category()).or_insert(0.0) += ticket.charge_amount;
        }
        revenue
    }

    /// 汇总记录
    pub fn summary(&self) -> ParkingSummary {
        ParkingSummary {
            total_spaces: self.inventory.total_count(),
            occupied_spaces: self.inventory.occupied_count(),
            available_spaces: self.inventory.total_count() - self.inventory.occupied_count(),
            occupancy_rate: self.inventory.occupancy_rate(),
            pricing_strategy: self.pricing_strategy.name().to_string(),
            total_revenue: self.total_revenue(),
            active_vehicles: self.active_tickets.len(),
            total_transactions: self.completed_tickets.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::VehicleSpecification;
    use crate::engine::clock::ManualClock;
    use crate::engine::strategy::{BasicPricing, SubscriptionPricing};
    use chrono::{Duration, NaiveDate};

    // ==========================================
    // 测试数据准备
    // ==========================================

    fn clock() -> Arc<ManualClock> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 17)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        Arc::new(ManualClock::new(start))
    }

    fn manager(clock: Arc<ManualClock>) -> ParkingManager {
        let mut manager = ParkingManager::with_clock(Box::new(BasicPricing::new()), clock);
        manager
            .add_spaces(vec![
                ParkingSpace::new("C1", SpaceSize::Compact).unwrap(),
                ParkingSpace::new("S1", SpaceSize::Standard).unwrap(),
                ParkingSpace::new("S2", SpaceSize::Standard).unwrap(),
                ParkingSpace::new("L1", SpaceSize::Large).unwrap(),
            ])
            .unwrap();
        manager
    }

    fn car(reg: &str) -> Vehicle {
        Vehicle::car(VehicleSpecification::new(reg, "Honda", "Civic", "Blue").unwrap())
    }

    #[test]
    fn test_ticket_ids_are_sequential() {
        let mut m = manager(clock());
        assert_eq!(m.park(car("A")).unwrap().ticket_id, "TKT1000");
        assert_eq!(m.park(car("B")).unwrap().ticket_id, "TKT1001");
    }

    #[test]
    fn test_custom_ticket_numbering() {
        let mut m = manager(clock()).with_ticket_numbering("P-", 1);
        assert_eq!(m.park(car("A")).unwrap().ticket_id, "P-1");
    }

    #[test]
    fn test_exhausted_ticket_sequence_is_rejected_without_mutation() {
        let mut m = manager(clock()).with_ticket_numbering("TKT", u64::MAX - 1);
        assert_eq!(
            m.park(car("A")).unwrap().ticket_id,
            format!("TKT{}", u64::MAX - 1)
        );

        let err = m.park(car("B")).unwrap_err();
        assert!(matches!(err, ParkingError::Validation(_)));
        assert!(!m.is_parked("B"));
        assert_eq!(m.space("S2").unwrap().status, SpaceStatus::Available);
        assert_eq!(m.occupancy_rate(), 25.0);
    }

    #[test]
    fn test_add_space_rejects_occupied_status() {
        let mut m = manager(clock());
        let space =
            ParkingSpace::with_details("S3", SpaceSize::Standard, SpaceStatus::Occupied, 1, "").unwrap();
        assert!(matches!(m.add_space(space), Err(ParkingError::Validation(_))));
        assert!(m.space("S3").is_none());
    }

    #[test]
    fn test_park_uses_first_fit() {
        let mut m = manager(clock());
        let ticket = m.park(car("A")).unwrap();
        assert_eq!(ticket.space.space_id, "S1");
        assert_eq!(ticket.space.status, SpaceStatus::Occupied);
        assert_eq!(m.space("S1").unwrap().status, SpaceStatus::Occupied);
        assert_eq!(m.park(car("B")).unwrap().space.space_id, "S2");
    }

    #[test]
    fn test_no_space_leaves_state_untouched() {
        let mut m = manager(clock());
        m.park(car("A")).unwrap();
        m.park(car("B")).unwrap();

        let err = m.park(car("C")).unwrap_err();
        assert_eq!(
            err,
            ParkingError::NoSpaceAvailable {
                size: SpaceSize::Standard,
                registration: "C".to_string()
            }
        );
        assert_eq!(m.available_space_count(None), 2);
        assert!(!m.is_parked("C"));
        // 失败不消耗票据序号
        m.retrieve("A").unwrap();
        assert_eq!(m.park(car("C")).unwrap().ticket_id, "TKT1002");
    }

    #[test]
    fn test_retrieve_computes_fee_and_frees_space() {
        let clock = clock();
        let mut m = manager(clock.clone());
        m.park(car("A")).unwrap();
        clock.advance(Duration::hours(2));

        let ticket = m.retrieve("A").unwrap();
        assert_eq!(ticket.charge_amount, 20.0);
        assert!(!ticket.is_active());
        assert_eq!(ticket.space.status, SpaceStatus::Available);
        assert!(m.space("S1").unwrap().is_available());
        assert_eq!(m.completed_tickets().len(), 1);
        assert_eq!(m.total_revenue(), 20.0);
    }

    #[test]
    fn test_quote_fee_does_not_mutate() {
        let clock = clock();
        let mut m = manager(clock.clone());
        m.park(car("A")).unwrap();
        clock.advance(Duration::hours(3));

        assert_eq!(m.quote_fee("A").unwrap(), 30.0);
        assert!(m.is_parked("A"));
        assert!(m.active_ticket("A").unwrap().is_active());
        assert!(matches!(m.quote_fee("Z"), Err(ParkingError::NotParked(_))));
    }

    #[test]
    fn test_strategy_switch_is_not_retroactive() {
        let clock = clock();
        let mut m = manager(clock.clone());
        m.park(car("A")).unwrap();
        m.park(car("B")).unwrap();
        clock.advance(Duration::hours(2));

        m.retrieve("A").unwrap();
        m.set_pricing_strategy(Box::new(SubscriptionPricing::new()));
        assert_eq!(m.current_strategy_name(), "Subscription Pricing");
        m.retrieve("B").unwrap();

        assert_eq!(m.completed_tickets()[0].charge_amount, 20.0);
        assert!((m.completed_tickets()[1].charge_amount - 100.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_space_status_rules() {
        let mut m = manager(clock());
        m.park(car("A")).unwrap();

        assert_eq!(
            m.set_space_status("S1", SpaceStatus::Maintenance),
            Err(ParkingError::InvalidStateTransition {
                from: SpaceStatus::Occupied,
                to: SpaceStatus::Maintenance
            })
        );
        assert!(matches!(
            m.set_space_status("S2", SpaceStatus::Occupied),
            Err(ParkingError::InvalidStateTransition { .. })
        ));
        assert!(matches!(
            m.set_space_status("X9", SpaceStatus::Reserved),
            Err(ParkingError::SpaceNotFound(_))
        ));

        m.set_space_status("S2", SpaceStatus::Maintenance).unwrap();
        assert!(matches!(m.park(car("B")), Err(ParkingError::NoSpaceAvailable { .. })));

        m.set_space_status("S2", SpaceStatus::Available).unwrap();
        assert_eq!(m.park(car("B")).unwrap().space.space_id, "S2");
    }

    #[test]
    fn test_charge_vehicle() {
        let mut m = manager(clock());
        let ev = car("EV1").with_charging(50.0).unwrap();
        m.park(ev).unwrap();
        m.park(car("A")).unwrap();

        assert_eq!(m.charge_vehicle("EV1", 60.0).unwrap(), 50.0);
        assert_eq!(
            m.active_ticket("EV1").unwrap().vehicle.charging().unwrap().charge_percentage(),
            100.0
        );
        assert!(matches!(m.charge_vehicle("A", 1.0), Err(ParkingError::Validation(_))));
        assert!(matches!(m.charge_vehicle("Z", 1.0), Err(ParkingError::NotParked(_))));
    }

    #[test]
    fn test_parked_vehicles_in_entry_order() {
        let mut m = manager(clock());
        m.park(car("B")).unwrap();
        m.park(car("A")).unwrap();
        let regs: Vec<&str> = m.parked_vehicles().iter().map(|v| v.registration()).collect();
        assert_eq!(regs, vec!["B", "A"]);
    }
}
