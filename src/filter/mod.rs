// ==========================================
// 营销物料投入产出分析系统 - 过滤引擎 (C3)
// ==========================================
// 职责: 按大区/省份/日期区间谓词筛选明细行
// 口径: 空集合/缺省字段 = 不限制;
//       日期区间两端含,start > end 先交换;
//       月份为 None 的行不参与任何日期过滤查询;
//       哨兵在规范化期已落列,选哨兵自然命中原空值行
// 红线: 纯函数,不修改输入
// ==========================================

use crate::domain::record::{SalesRecord, ShipmentRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// FilterPredicate - 查询谓词
// ==========================================
// 展示层以此为唯一查询入参
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterPredicate {
    /// 大区集合; None 或空集 = 不限制
    #[serde(default)]
    pub regions: Option<BTreeSet<String>>,

    /// 省份集合; None 或空集 = 不限制
    #[serde(default)]
    pub provinces: Option<BTreeSet<String>>,

    /// 日期区间（含两端,日精度）
    #[serde(default)]
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl FilterPredicate {
    /// 全量谓词（不加任何限制）
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_regions<S: Into<String>>(mut self, regions: impl IntoIterator<Item = S>) -> Self {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_provinces<S: Into<String>>(
        mut self,
        provinces: impl IntoIterator<Item = S>,
    ) -> Self {
        self.provinces = Some(provinces.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }

    /// 规范化后的日期区间（start > end 时交换）
    fn effective_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
            .map(|(start, end)| if start > end { (end, start) } else { (start, end) })
    }

    fn matches(&self, region: &str, province: &str, month: Option<NaiveDate>) -> bool {
        if let Some(regions) = &self.regions {
            if !regions.is_empty() && !regions.contains(region) {
                return false;
            }
        }
        if let Some(provinces) = &self.provinces {
            if !provinces.is_empty() && !provinces.contains(province) {
                return false;
            }
        }
        if let Some((start, end)) = self.effective_date_range() {
            match month {
                Some(d) => {
                    if d < start || d > end {
                        return false;
                    }
                }
                // 日期无法解析的行被任何日期过滤排除
                None => return false,
            }
        }
        true
    }
}

// ==========================================
// FilterEngine - 过滤引擎
// ==========================================
pub struct FilterEngine;

impl FilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// 筛选发货明细,返回新向量
    pub fn filter_shipments(
        &self,
        records: &[ShipmentRecord],
        predicate: &FilterPredicate,
    ) -> Vec<ShipmentRecord> {
        records
            .iter()
            .filter(|r| predicate.matches(&r.region, &r.province, r.shipment_month))
            .cloned()
            .collect()
    }

    /// 筛选销售明细,返回新向量
    pub fn filter_sales(
        &self,
        records: &[SalesRecord],
        predicate: &FilterPredicate,
    ) -> Vec<SalesRecord> {
        records
            .iter()
            .filter(|r| predicate.matches(&r.region, &r.province, r.shipment_month))
            .cloned()
            .collect()
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}
