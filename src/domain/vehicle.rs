// ==========================================
// 停车场管理系统 - 车辆领域模型
// ==========================================
// VehicleSpecification: 不可变规格值对象
// Vehicle: 车辆类型 + 规格 + 可选充电能力
// 身份: 以车牌号 (registration) 为唯一键
// ==========================================

use crate::domain::types::{SpaceSize, VehicleCategory};
use crate::error::{ParkingError, ParkingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// 默认低电量阈值 (%)
pub const DEFAULT_LOW_BATTERY_THRESHOLD_PCT: f64 = 20.0;

// ==========================================
// VehicleSpecification - 车辆规格
// ==========================================
// 构造后不可修改, 所有字段非空
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleSpecification {
    registration: String,
    make: String,
    model: String,
    color: String,
}

impl VehicleSpecification {
    /// 创建车辆规格
    ///
    /// # 错误
    /// 任一字段为空（或仅空白）时返回 `ParkingError::Validation`
    pub fn new(
        registration: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        color: impl Into<String>,
    ) -> ParkingResult<Self> {
        let spec = Self {
            registration: registration.into(),
            make: make.into(),
            model: model.into(),
            color: color.into(),
        };

        for (field, value) in [
            ("registration", &spec.registration),
            ("make", &spec.make),
            ("model", &spec.model),
            ("color", &spec.color),
        ] {
            if value.trim().is_empty() {
                return Err(ParkingError::validation(format!("{} 不能为空", field)));
            }
        }

        Ok(spec)
    }

    pub fn registration(&self) -> &str {
        &self.registration
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

// ==========================================
// ChargingCapability - 充电能力
// ==========================================
// 不变量: 0 <= current_charge_kwh <= max_charge_kwh, max_charge_kwh > 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingCapability {
    max_charge_kwh: f64,
    current_charge_kwh: f64,
}

impl ChargingCapability {
    /// 创建空电量的充电能力
    pub fn new(max_charge_kwh: f64) -> ParkingResult<Self> {
        if !(max_charge_kwh > 0.0) || !max_charge_kwh.is_finite() {
            return Err(ParkingError::validation(format!(
                "电池容量必须为正数: {}",
                max_charge_kwh
            )));
        }
        Ok(Self {
            max_charge_kwh,
            current_charge_kwh: 0.0,
        })
    }

    pub fn max_charge(&self) -> f64 {
        self.max_charge_kwh
    }

    pub fn current_charge(&self) -> f64 {
        self.current_charge_kwh
    }

    /// 当前电量百分比 (0-100)
    pub fn charge_percentage(&self) -> f64 {
        self.current_charge_kwh / self.max_charge_kwh * 100.0
    }

    /// 充电
    ///
    /// # 返回
    /// 实际充入电量（电池充满时可能小于请求值）
    pub fn charge(&mut self, amount_kwh: f64) -> ParkingResult<f64> {
        if !(amount_kwh >= 0.0) {
            return Err(ParkingError::validation(format!(
                "充电量不能为负: {}",
                amount_kwh
            )));
        }
        let actual = amount_kwh.min(self.max_charge_kwh - self.current_charge_kwh);
        self.current_charge_kwh += actual;
        Ok(actual)
    }

    /// 放电（模拟行驶消耗）
    ///
    /// # 返回
    /// 实际放出电量（不会低于 0）
    pub fn discharge(&mut self, amount_kwh: f64) -> ParkingResult<f64> {
        if !(amount_kwh >= 0.0) {
            return Err(ParkingError::validation(format!(
                "放电量不能为负: {}",
                amount_kwh
            )));
        }
        let actual = amount_kwh.min(self.current_charge_kwh);
        self.current_charge_kwh -= actual;
        Ok(actual)
    }

    pub fn is_fully_charged(&self) -> bool {
        self.current_charge_kwh >= self.max_charge_kwh
    }

    /// 判断是否低电量
    ///
    /// # 参数
    /// - `threshold_pct`: 阈值百分比（常用 `DEFAULT_LOW_BATTERY_THRESHOLD_PCT`）
    pub fn is_low_battery(&self, threshold_pct: f64) -> bool {
        self.charge_percentage() < threshold_pct
    }
}

// ==========================================
// Vehicle - 车辆
// ==========================================
// 相等性与哈希只看车牌号
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    category: VehicleCategory,
    specification: VehicleSpecification,
    charging: Option<ChargingCapability>,
}

impl Vehicle {
    pub fn new(category: VehicleCategory, specification: VehicleSpecification) -> Self {
        Self {
            category,
            specification,
            charging: None,
        }
    }

    pub fn car(specification: VehicleSpecification) -> Self {
        Self::new(VehicleCategory::Car, specification)
    }

    pub fn truck(specification: VehicleSpecification) -> Self {
        Self::new(VehicleCategory::Truck, specification)
    }

    pub fn motorcycle(specification: VehicleSpecification) -> Self {
        Self::new(VehicleCategory::Motorcycle, specification)
    }

    pub fn bus(specification: VehicleSpecification) -> Self {
        Self::new(VehicleCategory::Bus, specification)
    }

    /// 附加充电能力（电量从 0 开始）
    pub fn with_charging(mut self, max_charge_kwh: f64) -> ParkingResult<Self> {
        self.charging = Some(ChargingCapability::new(max_charge_kwh)?);
        Ok(self)
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    pub fn required_space_size(&self) -> SpaceSize {
        self.category.required_space_size()
    }

    pub fn registration(&self) -> &str {
        self.specification.registration()
    }

    pub fn specification(&self) -> &VehicleSpecification {
        &self.specification
    }

    pub fn has_charging(&self) -> bool {
        self.charging.is_some()
    }

    pub fn charging(&self) -> Option<&ChargingCapability> {
        self.charging.as_ref()
    }

    pub fn charging_mut(&mut self) -> Option<&mut ChargingCapability> {
        self.charging.as_mut()
    }
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.registration() == other.registration()
    }
}

impl Eq for Vehicle {}

impl Hash for Vehicle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.registration().hash(state);
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}) - Registration: {}, Color: {}",
            self.category,
            self.specification.make(),
            self.specification.model(),
            self.specification.registration(),
            self.specification.color()
        )?;
        if let Some(charging) = &self.charging {
            write!(
                f,
                " [Battery: {:.1}% ({:.1}/{:.1} kWh)]",
                charging.charge_percentage(),
                charging.current_charge(),
                charging.max_charge()
            )?;
        }
        Ok(())
    }
}
