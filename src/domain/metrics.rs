// ==========================================
// 营销物料投入产出分析系统 - 聚合指标领域模型
// ==========================================
// 依据: 物料ROI分析核心规格 - 派生聚合实体
// 用途: 聚合核(C4)/指标派生(C5)写入,投影层(C8)打包
// 约定: 所有百分比字段均为 ×100 口径（30.0 表示 30%）
// ==========================================

use crate::domain::types::{CustomerSegment, EfficiencyGroup};
use serde::{Deserialize, Serialize};

// ==========================================
// DimensionMetric - 单维度聚合指标
// ==========================================
// 大区/省份/月份/业务员视图共用; key 为该维度取值
// （月份视图用 "YYYY-MM" 字符串保证排序稳定）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionMetric {
    pub key: String,                       // 维度取值
    pub material_quantity: f64,            // 物料数量合计
    pub material_cost: f64,                // 物料费用合计
    pub sales_amount: f64,                 // 销售额合计
    pub fee_ratio: f64,                    // 费比（%,[0,1000]）
    pub material_efficiency: Option<f64>,  // 物料效率 = 销售额/物料数量（数量≤0 时无定义）
    pub roi: Option<f64>,                  // ROI = 销售额/物料费用（费用≤0 时无定义）
    pub sales_share: f64,                  // 销售额占比（%）
}

// ==========================================
// CustomerMetric - 客户（经销商）聚合指标
// ==========================================
// 主键: (customer_code, distributor_name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerMetric {
    // ===== 主键 =====
    pub customer_code: String,
    pub distributor_name: String,

    // ===== 归属维度（首见行回填）=====
    pub region: String,
    pub province: String,

    // ===== 聚合量 =====
    pub material_quantity: f64,
    pub material_cost: f64,
    pub sales_amount: f64,

    // ===== 派生指标 =====
    pub fee_ratio: f64,                   // 费比（%）
    pub material_efficiency: Option<f64>, // 物料效率
    pub roi: Option<f64>,                 // ROI
    pub customer_value: f64,              // 客户价值 = 销售额 − 物料费用（可为负）
    pub sales_share: f64,                 // 销售额占比（%）
    pub value_rank: u32,                  // 价值排名（降序,min 并列法）

    // ===== 分层（C6 写入）=====
    pub value_score: u8,           // 价值四分位得分 1..4
    pub efficiency_score: u8,      // 效率四分位得分 1..4
    pub segment: CustomerSegment,  // 客户分层
    pub potential_score: f64,      // 潜力得分 [0,100]
}

// ==========================================
// MaterialProductAssociation - 物料×产品关联
// ==========================================
// 主键: (material_code, product_code)
// 口径: 客户-月共现归因,共现的每个物料×产品对
//       记入该客户当月全部销售额（不按比例拆分）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialProductAssociation {
    pub material_code: String,
    pub material_name: String,
    pub product_code: String,
    pub product_name: String,
    pub material_quantity: f64,
    pub material_cost: f64,
    pub sales_amount: f64,
    pub roi: Option<f64>,        // 销售额/物料费用
    pub efficiency: Option<f64>, // 销售额/物料数量
}

// ==========================================
// MaterialCombinationPerformance - 物料组合表现
// ==========================================
// 主键: combination（客户当月所用物料编码集合,排序后逗号拼接）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialCombinationPerformance {
    pub combination: String, // 规范组合键,如 "A,B"
    pub usage_count: u32,    // 出现的客户-月次数
    pub total_sales: f64,    // 销售额合计
    pub avg_sales: f64,      // 单次平均销售额
    pub total_cost: f64,     // 物料费用合计
    pub avg_roi: f64,        // 单次 ROI 均值（费用≤0 的次记 0）
}

// ==========================================
// RegressionStats - 销售额~物料数量回归
// ==========================================
// 样本: 关联成功的客户-月（x=物料数量, y=销售额）
// 不足 2 个不同 x 值时 slope/intercept/r² 全为 0
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegressionStats {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub sample_count: u32,
}

// ==========================================
// FeeRatioAnomaly - 费比异常客户
// ==========================================
// 阈值 = max(全局费比, 客户费比均值) × 异常倍率
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeRatioAnomaly {
    pub customer_code: String,
    pub distributor_name: String,
    pub fee_ratio: f64,        // 该客户费比（%）
    pub global_fee_ratio: f64, // 当前范围全局费比（%）
    pub threshold: f64,        // 触发阈值（%）
    pub severity: f64,         // 严重度 = 客户费比/全局费比（全局为 0 时记 0）
}

// ==========================================
// SegmentSummary - 分层汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: CustomerSegment,
    pub customer_count: u32,
    pub sales_amount: f64,
    pub material_cost: f64,
    pub avg_fee_ratio: f64, // 客户费比算术均值（%）
    pub sales_share: f64,   // 销售额占比（%）
}

// ==========================================
// EfficiencyComparison - 高低效率对比
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyComparison {
    pub group: EfficiencyGroup,
    pub customer_count: u32,
    pub sales_amount: f64,
    pub material_cost: f64,
    pub avg_fee_ratio: f64,          // 客户费比均值（%）
    pub avg_efficiency: f64,         // 客户物料效率均值（无定义的客户不计入）
    pub avg_customer_value: f64,     // 客户价值均值
}

// ==========================================
// WarningCounters - 加载期告警计数
// ==========================================
// 规格 §7: 行级告警只计数不中断,随目录一并输出
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningCounters {
    pub coercion_dropped_rows: u32, // 数值无法解析而丢弃的行数
    pub coercion_bad_dates: u32,    // 月份无法解析（行保留,记 None）
    pub price_lookup_misses: u32,   // 价格表缺失编码的发货行数
}

impl WarningCounters {
    /// 逐项累加另一组计数（C1 按表计数后汇总）
    pub fn merge(&mut self, other: &WarningCounters) {
        self.coercion_dropped_rows += other.coercion_dropped_rows;
        self.coercion_bad_dates += other.coercion_bad_dates;
        self.price_lookup_misses += other.price_lookup_misses;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_counters_merge_accumulates() {
        let mut total = WarningCounters {
            coercion_dropped_rows: 1,
            coercion_bad_dates: 0,
            price_lookup_misses: 2,
        };
        total.merge(&WarningCounters {
            coercion_dropped_rows: 2,
            coercion_bad_dates: 3,
            price_lookup_misses: 0,
        });

        assert_eq!(
            total,
            WarningCounters {
                coercion_dropped_rows: 3,
                coercion_bad_dates: 3,
                price_lookup_misses: 2,
            }
        );
    }
}
