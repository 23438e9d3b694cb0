// ==========================================
// 营销物料投入产出分析系统 - 明细行领域模型
// ==========================================
// 依据: 物料ROI分析核心规格 - 输入实体
// 用途: 规范化层(C1)产出,富化层(C2)补齐派生列,
//       下游引擎只读
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// ShipmentRecord - 物料发货明细
// ==========================================
// shipment_month 统一截断到月初; 解析失败为 None,
// 该行保留但不参与任何日期过滤查询
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
    // ===== 业务键 =====
    pub shipment_month: Option<NaiveDate>, // 发货月份（月精度,取月初）
    pub region: String,                    // 大区（空值→未知区域）
    pub province: String,                  // 省份（空值→未知省份）
    pub city: String,                      // 城市
    pub distributor_name: String,          // 经销商名称
    pub customer_code: String,             // 客户编码
    pub material_code: String,             // 物料编码
    pub material_name: String,             // 物料名称
    pub applicant: String,                 // 申请人（业务员）

    // ===== 数量 =====
    pub material_quantity: f64, // 物料数量（件）

    // ===== 富化层派生（C2 写入）=====
    pub unit_price: f64,    // 物料单价（价格表缺失时为 0）
    pub material_cost: f64, // 物料费用 = 数量 × 单价
}

// ==========================================
// SalesRecord - 产品销售明细
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    // ===== 业务键 =====
    pub shipment_month: Option<NaiveDate>, // 发货月份（月精度,取月初）
    pub region: String,                    // 大区（空值→未知区域）
    pub province: String,                  // 省份（空值→未知省份）
    pub city: String,                      // 城市
    pub distributor_name: String,          // 经销商名称
    pub customer_code: String,             // 客户编码
    pub product_code: String,              // 产品编码
    pub product_name: String,              // 产品名称
    pub applicant: String,                 // 申请人（业务员）

    // ===== 数量与金额 =====
    pub quantity_cases: f64,      // 销售数量（箱）
    pub unit_price_per_case: f64, // 单价（元/箱）

    // ===== 富化层派生（C2 写入）=====
    pub sales_amount: f64, // 销售额 = 箱数 × 单价
}

// ==========================================
// PriceBook - 物料单价表
// ==========================================
// material_code → unit_price 映射,C2 富化时查询
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceBook {
    prices: HashMap<String, f64>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 录入单价; 同一编码重复出现时保留最后一条
    pub fn insert(&mut self, material_code: String, unit_price: f64) {
        self.prices.insert(material_code, unit_price);
    }

    /// 查询单价; None 表示价格表缺失该编码
    pub fn lookup(&self, material_code: &str) -> Option<f64> {
        self.prices.get(material_code).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
