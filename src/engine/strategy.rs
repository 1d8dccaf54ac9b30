// ==========================================
// 停车场管理系统 - 计费策略
// ==========================================
// 用途：
// - 出场时由 ParkingManager 调用当前策略计算费用；
// - 策略可在运行时替换, 只影响之后出场的票据。
// 约定: 策略为票据状态的纯函数, 不跨票据保存状态
// ==========================================

use crate::domain::ticket::ParkingTicket;
use crate::domain::types::VehicleCategory;
use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// 最短计费时长（小时）
pub const MINIMUM_BILLABLE_HOURS: f64 = 0.5;

/// 最低收费
pub const MINIMUM_CHARGE: f64 = 2.0;

/// EV 估算耗电 (kWh/小时)
pub const EV_ESTIMATED_KWH_PER_HOUR: f64 = 5.0;

/// EV 充电单价 (每 kWh)
pub const EV_CHARGING_RATE_PER_KWH: f64 = 0.50;

// ==========================================
// Trait: PricingStrategy
// ==========================================
pub trait PricingStrategy: Send + Sync {
    /// 计算票据费用（非负）
    fn calculate_fee(&self, ticket: &ParkingTicket) -> f64;

    /// 策略显示名称
    fn name(&self) -> &str;
}

/// 计费时长: 实际时长, 不足半小时按半小时
fn billable_hours(ticket: &ParkingTicket) -> f64 {
    ticket.duration_hours().max(MINIMUM_BILLABLE_HOURS)
}

// ==========================================
// RateTable - 按车辆类型的费率表
// ==========================================
// 每种车辆类型都有费率, 不需要兜底默认值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable {
    motorcycle: f64,
    car: f64,
    truck: f64,
    bus: f64,
}

impl RateTable {
    pub fn new(motorcycle: f64, car: f64, truck: f64, bus: f64) -> Self {
        Self {
            motorcycle,
            car,
            truck,
            bus,
        }
    }

    pub fn rate_for(&self, category: VehicleCategory) -> f64 {
        match category {
            VehicleCategory::Motorcycle => self.motorcycle,
            VehicleCategory::Car => self.car,
            VehicleCategory::Truck => self.truck,
            VehicleCategory::Bus => self.bus,
        }
    }

    /// 标准小时费率 {Motorcycle:5, Car:10, Truck:15, Bus:15}
    pub fn standard_hourly() -> Self {
        Self::new(5.0, 10.0, 15.0, 15.0)
    }

    /// 月租费率 {Motorcycle:50, Car:100, Truck:150, Bus:150}
    pub fn monthly_subscription() -> Self {
        Self::new(50.0, 100.0, 150.0, 150.0)
    }

    /// EV 半价小时费率 {Motorcycle:2.5, Car:5, Truck:7.5, Bus:7.5}
    pub fn ev_hourly() -> Self {
        Self::new(2.5, 5.0, 7.5, 7.5)
    }
}

// ==========================================
// BasicPricing - 基础小时计费
// ==========================================
// fee = max(hours * rate, 2.0)
#[derive(Debug, Clone)]
pub struct BasicPricing {
    rates: RateTable,
}

impl BasicPricing {
    pub fn new() -> Self {
        Self {
            rates: RateTable::standard_hourly(),
        }
    }
}

impl Default for BasicPricing {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingStrategy for BasicPricing {
    fn calculate_fee(&self, ticket: &ParkingTicket) -> f64 {
        let rate = self.rates.rate_for(ticket.vehicle.category());
        (billable_hours(ticket) * rate).max(MINIMUM_CHARGE)
    }

    fn name(&self) -> &str {
        "Basic Hourly Rate"
    }
}

// ==========================================
// PeakHourPricing - 高峰动态计费
// ==========================================
// 按入场时刻的小时取倍率:
// - [9,12) 或 [17,19): 1.5 (高峰)
// - >=22 或 <6: 0.5 (夜间)
// - 其余: 1.0
#[derive(Debug, Clone)]
pub struct PeakHourPricing {
    rates: RateTable,
}

impl PeakHourPricing {
    pub fn new() -> Self {
        Self {
            rates: RateTable::standard_hourly(),
        }
    }

    /// 入场小时对应的倍率
    pub fn multiplier_for_hour(hour: u32) -> f64 {
        if (9..12).contains(&hour) || (17..19).contains(&hour) {
            1.5
        } else if hour >= 22 || hour < 6 {
            0.5
        } else {
            1.0
        }
    }
}

impl Default for PeakHourPricing {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingStrategy for PeakHourPricing {
    fn calculate_fee(&self, ticket: &ParkingTicket) -> f64 {
        let rate = self.rates.rate_for(ticket.vehicle.category());
        let multiplier = Self::multiplier_for_hour(ticket.entry_time.hour());
        (billable_hours(ticket) * rate * multiplier).max(MINIMUM_CHARGE)
    }

    fn name(&self) -> &str {
        "Peak Hour Dynamic Pricing"
    }
}

// ==========================================
// SubscriptionPricing - 月租折算日费
// ==========================================
// daily = monthly / 30; days = max(hours / 24, 1); fee = days * daily
// 注意: 此处不使用半小时最短计费, 只有 1 天下限
#[derive(Debug, Clone)]
pub struct SubscriptionPricing {
    monthly_rates: RateTable,
}

impl SubscriptionPricing {
    pub fn new() -> Self {
        Self {
            monthly_rates: RateTable::monthly_subscription(),
        }
    }
}

impl Default for SubscriptionPricing {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingStrategy for SubscriptionPricing {
    fn calculate_fee(&self, ticket: &ParkingTicket) -> f64 {
        let daily_rate = self.monthly_rates.rate_for(ticket.vehicle.category()) / 30.0;
        let days = (ticket.duration_hours() / 24.0).max(1.0);
        days * daily_rate
    }

    fn name(&self) -> &str {
        "Subscription Pricing"
    }
}

// ==========================================
// EvChargingPricing - 充电感知计费
// ==========================================
// parking = hours * 半价费率
// charging = hours * 5 kWh * 0.5 (仅带充电能力的车辆; 按固定估算, 不看实际电量)
// fee = max(parking + charging, 2.0)
#[derive(Debug, Clone)]
pub struct EvChargingPricing {
    rates: RateTable,
}

impl EvChargingPricing {
    pub fn new() -> Self {
        Self {
            rates: RateTable::ev_hourly(),
        }
    }
}

impl Default for EvChargingPricing {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingStrategy for EvChargingPricing {
    fn calculate_fee(&self, ticket: &ParkingTicket) -> f64 {
        let hours = billable_hours(ticket);
        let parking_fee = hours * self.rates.rate_for(ticket.vehicle.category());

        let charging_fee = if ticket.vehicle.has_charging() {
            hours * EV_ESTIMATED_KWH_PER_HOUR * EV_CHARGING_RATE_PER_KWH
        } else {
            0.0
        };

        (parking_fee + charging_fee).max(MINIMUM_CHARGE)
    }

    fn name(&self) -> &str {
        "EV Charging-Aware Pricing"
    }
}

// ==========================================
// PricingStrategyKind - 策略选择入口
// ==========================================
// 配置文件中以字符串指定, 由此构造具体策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategyKind {
    Basic,
    PeakHour,
    Subscription,
    EvCharging,
}

impl PricingStrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingStrategyKind::Basic => "basic",
            PricingStrategyKind::PeakHour => "peak_hour",
            PricingStrategyKind::Subscription => "subscription",
            PricingStrategyKind::EvCharging => "ev_charging",
        }
    }

    /// 构造对应的策略实例
    pub fn build(&self) -> Box<dyn PricingStrategy> {
        match self {
            PricingStrategyKind::Basic => Box::new(BasicPricing::new()),
            PricingStrategyKind::PeakHour => Box::new(PeakHourPricing::new()),
            PricingStrategyKind::Subscription => Box::new(SubscriptionPricing::new()),
            PricingStrategyKind::EvCharging => Box::new(EvChargingPricing::new()),
        }
    }
}

impl Default for PricingStrategyKind {
    fn default() -> Self {
        PricingStrategyKind::Basic
    }
}

impl std::str::FromStr for PricingStrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(PricingStrategyKind::Basic),
            "peak_hour" | "peak-hour" | "peak" => Ok(PricingStrategyKind::PeakHour),
            "subscription" => Ok(PricingStrategyKind::Subscription),
            "ev_charging" | "ev-charging" | "ev" => Ok(PricingStrategyKind::EvCharging),
            other => Err(format!("未知计费策略: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::space::ParkingSpace;
    use crate::domain::types::SpaceSize;
    use crate::domain::vehicle::{Vehicle, VehicleSpecification};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    // ==========================================
    // 测试数据准备
    // ==========================================

    fn at_hour(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 17)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn spec(reg: &str) -> VehicleSpecification {
        VehicleSpecification::new(reg, "Make", "Model", "Grey").unwrap()
    }

    /// 创建已出场票据
    fn completed(vehicle: Vehicle, entry: NaiveDateTime, minutes: i64) -> ParkingTicket {
        let space = ParkingSpace::new("S1", vehicle.required_space_size()).unwrap();
        let mut ticket = ParkingTicket::new("TKT1000".to_string(), vehicle, space, entry);
        ticket.exit_time = Some(entry + Duration::minutes(minutes));
        ticket
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_basic_pricing() {
        let strategy = BasicPricing::new();

        let car = completed(Vehicle::car(spec("CAR1")), at_hour(13), 120);
        assert_close(strategy.calculate_fee(&car), 20.0);

        // 10 分钟按 0.5 小时计: 0.5 * 5 = 2.5
        let moto = completed(Vehicle::motorcycle(spec("MOT1")), at_hour(13), 10);
        assert_close(strategy.calculate_fee(&moto), 2.5);

        let truck = completed(Vehicle::truck(spec("TRK1")), at_hour(13), 60);
        assert_close(strategy.calculate_fee(&truck), 15.0);
    }

    #[test]
    fn test_basic_pricing_minimum_charge() {
        let strategy = BasicPricing::new();
        // 0.5 * 10 = 5 > 2; 最低收费只对更低的费率生效
        let car = completed(Vehicle::car(spec("CAR1")), at_hour(13), 0);
        assert_close(strategy.calculate_fee(&car), 5.0);

        let mut rates_low = BasicPricing::new();
        rates_low.rates = RateTable::new(1.0, 1.0, 1.0, 1.0);
        assert_close(rates_low.calculate_fee(&car), MINIMUM_CHARGE);
    }

    #[test]
    fn test_rate_table_covers_every_category() {
        let table = RateTable::standard_hourly();
        let rates: Vec<f64> = VehicleCategory::ALL.iter().map(|c| table.rate_for(*c)).collect();
        assert_eq!(rates, vec![10.0, 15.0, 5.0, 15.0]);
        assert_eq!(RateTable::ev_hourly().rate_for(VehicleCategory::Bus), 7.5);
        assert_eq!(RateTable::monthly_subscription().rate_for(VehicleCategory::Motorcycle), 50.0);
    }

    #[test]
    fn test_peak_hour_multipliers() {
        assert_eq!(PeakHourPricing::multiplier_for_hour(9), 1.5);
        assert_eq!(PeakHourPricing::multiplier_for_hour(11), 1.5);
        assert_eq!(PeakHourPricing::multiplier_for_hour(12), 1.0);
        assert_eq!(PeakHourPricing::multiplier_for_hour(17), 1.5);
        assert_eq!(PeakHourPricing::multiplier_for_hour(19), 1.0);
        assert_eq!(PeakHourPricing::multiplier_for_hour(22), 0.5);
        assert_eq!(PeakHourPricing::multiplier_for_hour(5), 0.5);
        assert_eq!(PeakHourPricing::multiplier_for_hour(6), 1.0);
    }

    #[test]
    fn test_peak_hour_pricing() {
        let strategy = PeakHourPricing::new();

        let peak = completed(Vehicle::car(spec("CAR1")), at_hour(10), 120);
        assert_close(strategy.calculate_fee(&peak), 30.0);

        let night = completed(Vehicle::car(spec("CAR2")), at_hour(2), 120);
        assert_close(strategy.calculate_fee(&night), 10.0);

        // 夜间摩托 30 分钟: 0.5 * 5 * 0.5 = 1.25 → 最低 2.0
        let moto = completed(Vehicle::motorcycle(spec("MOT1")), at_hour(23), 30);
        assert_close(strategy.calculate_fee(&moto), 2.0);
    }

    #[test]
    fn test_subscription_pricing() {
        let strategy = SubscriptionPricing::new();

        // 不足 1 天按 1 天
        let car = completed(Vehicle::car(spec("CAR1")), at_hour(8), 12 * 60);
        assert_close(strategy.calculate_fee(&car), 100.0 / 30.0);

        let bus = completed(Vehicle::bus(spec("BUS1")), at_hour(8), 48 * 60);
        assert_close(strategy.calculate_fee(&bus), 2.0 * 150.0 / 30.0);
    }

    #[test]
    fn test_ev_charging_pricing() {
        let strategy = EvChargingPricing::new();

        let ev = Vehicle::car(spec("EV1")).with_charging(75.0).unwrap();
        let ticket = completed(ev, at_hour(14), 60);
        assert_close(strategy.calculate_fee(&ticket), 7.5);

        // 非电动车只收半价停车费
        let plain = completed(Vehicle::car(spec("CAR1")), at_hour(14), 60);
        assert_close(strategy.calculate_fee(&plain), 5.0);

        let moto = completed(Vehicle::motorcycle(spec("MOT1")), at_hour(14), 20);
        assert_close(strategy.calculate_fee(&moto), 2.0);
    }

    #[test]
    fn test_strategy_kind_parse_and_build() {
        assert_eq!("peak-hour".parse::<PricingStrategyKind>(), Ok(PricingStrategyKind::PeakHour));
        assert_eq!("EV_CHARGING".parse::<PricingStrategyKind>(), Ok(PricingStrategyKind::EvCharging));
        assert!("flat".parse::<PricingStrategyKind>().is_err());

        assert_eq!(PricingStrategyKind::default().build().name(), "Basic Hourly Rate");
        assert_eq!(PricingStrategyKind::Subscription.build().name(), "Subscription Pricing");
    }
}
