// ==========================================
// 停车场管理系统 - 车辆工厂
// ==========================================
// 运行时注册表: 车辆类型 → 构造函数
// 未注册或无法识别的类型返回 UnknownCategory
// ==========================================

use crate::domain::types::VehicleCategory;
use crate::domain::vehicle::{Vehicle, VehicleSpecification};
use crate::error::{ParkingError, ParkingResult};
use std::collections::HashMap;

/// 车辆构造函数
pub type VehicleConstructor = fn(VehicleSpecification) -> Vehicle;

// ==========================================
// VehicleFactory - 车辆工厂
// ==========================================
#[derive(Debug, Clone)]
pub struct VehicleFactory {
    constructors: HashMap<VehicleCategory, VehicleConstructor>,
}

impl VehicleFactory {
    /// 创建空注册表
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// 注册（或替换）某类型的构造函数
    pub fn register(&mut self, category: VehicleCategory, constructor: VehicleConstructor) {
        self.constructors.insert(category, constructor);
    }

    pub fn is_registered(&self, category: VehicleCategory) -> bool {
        self.constructors.contains_key(&category)
    }

    /// 创建车辆
    ///
    /// # 错误
    /// - `UnknownCategory`: 类型未注册
    /// - `Validation`: 规格字段为空
    pub fn create_vehicle(
        &self,
        category: VehicleCategory,
        registration: &str,
        make: &str,
        model: &str,
        color: &str,
    ) -> ParkingResult<Vehicle> {
        let constructor = self
            .constructors
            .get(&category)
            .ok_or_else(|| ParkingError::UnknownCategory(category.to_string()))?;

        let spec = VehicleSpecification::new(registration, make, model, color)?;
        Ok(constructor(spec))
    }

    /// 按类型名称创建车辆（大小写不敏感）
    pub fn create_vehicle_by_name(
        &self,
        category_name: &str,
        registration: &str,
        make: &str,
        model: &str,
        color: &str,
    ) -> ParkingResult<Vehicle> {
        let category: VehicleCategory = category_name.parse()?;
        self.create_vehicle(category, registration, make, model, color)
    }

    /// 创建带充电能力的车辆（电量从 0 开始）
    pub fn create_electric_vehicle(
        &self,
        category: VehicleCategory,
        registration: &str,
        make: &str,
        model: &str,
        color: &str,
        max_charge_kwh: f64,
    ) -> ParkingResult<Vehicle> {
        self.create_vehicle(category, registration, make, model, color)?
            .with_charging(max_charge_kwh)
    }
}

impl Default for VehicleFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register(VehicleCategory::Car, Vehicle::car);
        factory.register(VehicleCategory::Truck, Vehicle::truck);
        factory.register(VehicleCategory::Motorcycle, Vehicle::motorcycle);
        factory.register(VehicleCategory::Bus, Vehicle::bus);
        factory
    }
}
