// ==========================================
// 营销物料投入产出分析系统 - 聚合核 (C4)
// ==========================================
// 职责: 沿各业务维度做分组求和,并把物料侧与
//       销售侧按键外连接（缺侧补 0）
// 口径: BTreeMap 保证键序确定;
//       月份维度跳过 shipment_month 为 None 的行
// 红线: 无状态引擎,纯函数
// ==========================================

use crate::domain::record::{SalesRecord, ShipmentRecord};
use std::collections::BTreeMap;

// ==========================================
// SideSums - 双侧可加量
// ==========================================
// 物料侧: material_quantity / material_cost
// 销售侧: sales_amount
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideSums {
    pub material_quantity: f64,
    pub material_cost: f64,
    pub sales_amount: f64,
}

impl SideSums {
    fn add_shipment(&mut self, r: &ShipmentRecord) {
        self.material_quantity += r.material_quantity;
        self.material_cost += r.material_cost;
    }

    fn add_sale(&mut self, r: &SalesRecord) {
        self.sales_amount += r.sales_amount;
    }
}

// ==========================================
// CustomerSums - 客户聚合（带归属维度）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CustomerSums {
    pub sums: SideSums,
    pub region: String,   // 首见行回填
    pub province: String, // 首见行回填
}

pub struct AggregationEngine;

impl AggregationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 按大区聚合
    pub fn by_region(
        &self,
        shipments: &[ShipmentRecord],
        sales: &[SalesRecord],
    ) -> BTreeMap<String, SideSums> {
        self.group(
            shipments,
            sales,
            |s| Some(s.region.clone()),
            |s| Some(s.region.clone()),
        )
    }

    /// 按省份聚合
    pub fn by_province(
        &self,
        shipments: &[ShipmentRecord],
        sales: &[SalesRecord],
    ) -> BTreeMap<String, SideSums> {
        self.group(
            shipments,
            sales,
            |s| Some(s.province.clone()),
            |s| Some(s.province.clone()),
        )
    }

    /// 按月份聚合; 键为 "YYYY-MM",月份缺失的行不参与
    pub fn by_month(
        &self,
        shipments: &[ShipmentRecord],
        sales: &[SalesRecord],
    ) -> BTreeMap<String, SideSums> {
        self.group(
            shipments,
            sales,
            |s| s.shipment_month.map(|d| d.format("%Y-%m").to_string()),
            |s| s.shipment_month.map(|d| d.format("%Y-%m").to_string()),
        )
    }

    /// 按申请人（业务员）聚合
    pub fn by_applicant(
        &self,
        shipments: &[ShipmentRecord],
        sales: &[SalesRecord],
    ) -> BTreeMap<String, SideSums> {
        self.group(
            shipments,
            sales,
            |s| Some(s.applicant.clone()),
            |s| Some(s.applicant.clone()),
        )
    }

    /// 按客户 (customer_code, distributor_name) 聚合,
    /// 归属大区/省份取首见行（发货侧优先）
    pub fn by_customer(
        &self,
        shipments: &[ShipmentRecord],
        sales: &[SalesRecord],
    ) -> BTreeMap<(String, String), CustomerSums> {
        let mut groups: BTreeMap<(String, String), CustomerSums> = BTreeMap::new();

        for r in shipments {
            let key = (r.customer_code.clone(), r.distributor_name.clone());
            let entry = groups.entry(key).or_default();
            if entry.region.is_empty() {
                entry.region = r.region.clone();
                entry.province = r.province.clone();
            }
            entry.sums.add_shipment(r);
        }
        for r in sales {
            let key = (r.customer_code.clone(), r.distributor_name.clone());
            let entry = groups.entry(key).or_default();
            if entry.region.is_empty() {
                entry.region = r.region.clone();
                entry.province = r.province.clone();
            }
            entry.sums.add_sale(r);
        }
        groups
    }

    /// 通用分组: 两侧各自取键,外连接进同一映射
    fn group<K: Ord>(
        &self,
        shipments: &[ShipmentRecord],
        sales: &[SalesRecord],
        shipment_key: impl Fn(&ShipmentRecord) -> Option<K>,
        sales_key: impl Fn(&SalesRecord) -> Option<K>,
    ) -> BTreeMap<K, SideSums> {
        let mut groups: BTreeMap<K, SideSums> = BTreeMap::new();

        for r in shipments {
            if let Some(key) = shipment_key(r) {
                groups.entry(key).or_default().add_shipment(r);
            }
        }
        for r in sales {
            if let Some(key) = sales_key(r) {
                groups.entry(key).or_default().add_sale(r);
            }
        }
        groups
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}
