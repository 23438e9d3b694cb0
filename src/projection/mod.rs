// ==========================================
// 营销物料投入产出分析系统 - 视图投影层 (C8)
// ==========================================
// 职责: 对外唯一查询面 project(谓词) → 视图目录
// 状态机: idle → normalized(C1) → enriched(C2) →
//         filtered(按查询 C3) → aggregated(C4) →
//         derived(C5) → projected(C8)
// 口径: 规范化+富化结果驻留本上下文（备忘),
//       输入刷新 = 重建上下文; 下游派生每查询重算;
//       同一次投影内所有视图共享同一过滤快照
// ==========================================

use crate::config::AnalysisParams;
use crate::domain::metrics::{
    CustomerMetric, DimensionMetric, EfficiencyComparison, FeeRatioAnomaly,
    MaterialCombinationPerformance, MaterialProductAssociation, RegressionStats, SegmentSummary,
    WarningCounters,
};
use crate::domain::record::{SalesRecord, ShipmentRecord};
use crate::engine::{
    group_customer_months, AggregationEngine, AnomalyEngine, CombinationEngine, CorrelationEngine,
    MetricDerivationEngine, SegmentationEngine,
};
use crate::enrich::Enricher;
use crate::filter::{FilterEngine, FilterPredicate};
use crate::engine::ratio;
use crate::schema::{AnalysisResult, RawTable, SchemaNormalizer};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

// ==========================================
// ViewCatalogue - 固定视图目录
// ==========================================
// 展示层消费的全部派生表; 行序确定,可直接序列化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCatalogue {
    pub region_metrics: Vec<DimensionMetric>,
    pub province_metrics: Vec<DimensionMetric>,
    pub customer_metrics: Vec<CustomerMetric>,
    pub time_metrics: Vec<DimensionMetric>,
    pub salesperson_metrics: Vec<DimensionMetric>,
    pub material_product_association: Vec<MaterialProductAssociation>,
    pub material_combination_performance: Vec<MaterialCombinationPerformance>,
    pub regression_stats: RegressionStats,
    pub anomaly_list: Vec<FeeRatioAnomaly>,
    pub segmentation_summary: Vec<SegmentSummary>,
    pub potential_customers: Vec<CustomerMetric>,
    pub high_low_efficiency_comparison: Vec<EfficiencyComparison>,

    // ===== 目录元数据 =====
    pub warnings: WarningCounters, // 加载期行级告警计数
    pub total_sales: f64,          // 范围内销售额合计
    pub total_material_cost: f64,  // 范围内物料费用合计
    pub global_fee_ratio: f64,     // 范围全局费比（%）
}

// ==========================================
// AnalysisContext - 分析上下文
// ==========================================
// 持有规范化+富化后的两张驻留表（备忘层）。
// 单写者(load)多读者(project),读写不交叠,无需加锁
#[derive(Debug)]
pub struct AnalysisContext {
    shipments: Vec<ShipmentRecord>,
    sales: Vec<SalesRecord>,
    warnings: WarningCounters,
    params: AnalysisParams,
}

impl AnalysisContext {
    /// 加载三张原始表（C1 规范化 + C2 富化),构建驻留上下文
    ///
    /// # 错误
    /// 缺少必需列或价格列无法解析时返回 `AnalysisError::Schema`
    pub fn load(
        shipments_raw: &RawTable,
        sales_raw: &RawTable,
        prices_raw: &RawTable,
    ) -> AnalysisResult<Self> {
        Self::load_with_params(shipments_raw, sales_raw, prices_raw, AnalysisParams::default())
    }

    /// 以自定义分析参数加载
    pub fn load_with_params(
        shipments_raw: &RawTable,
        sales_raw: &RawTable,
        prices_raw: &RawTable,
        params: AnalysisParams,
    ) -> AnalysisResult<Self> {
        let started = Instant::now();

        let normalized =
            SchemaNormalizer::new().normalize(shipments_raw, sales_raw, prices_raw)?;
        let mut shipments = normalized.shipments;
        let mut sales = normalized.sales;
        let mut warnings = normalized.warnings;

        let enricher = Enricher::new();
        enricher.enrich_shipments(&mut shipments, &normalized.prices, &mut warnings);
        enricher.enrich_sales(&mut sales);

        info!(
            shipments = shipments.len(),
            sales = sales.len(),
            price_misses = warnings.price_lookup_misses,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "分析上下文加载完成"
        );

        Ok(Self {
            shipments,
            sales,
            warnings,
            params,
        })
    }

    /// 加载期告警计数
    pub fn warnings(&self) -> WarningCounters {
        self.warnings
    }

    /// 驻留明细行数 (发货, 销售)
    pub fn record_counts(&self) -> (usize, usize) {
        (self.shipments.len(), self.sales.len())
    }

    /// 按谓词投影固定视图目录
    ///
    /// 每次调用对驻留快照重算全部派生表;
    /// 空范围返回空表而非错误
    pub fn project(&self, predicate: &FilterPredicate) -> ViewCatalogue {
        let started = Instant::now();

        // C3: 过滤
        let filter_engine = FilterEngine::new();
        let shipments = filter_engine.filter_shipments(&self.shipments, predicate);
        let sales = filter_engine.filter_sales(&self.sales, predicate);

        // 范围总量（快照一致性的锚点）
        let total_sales: f64 = sales.iter().map(|r| r.sales_amount).sum();
        let total_material_cost: f64 = shipments.iter().map(|r| r.material_cost).sum();
        let global_fee_ratio = ratio::fee_ratio(
            total_material_cost,
            total_sales,
            self.params.fee_ratio_ceiling,
        );

        // C4: 聚合
        let aggregation = AggregationEngine::new();
        let derivation = MetricDerivationEngine::new(self.params.clone());

        // C5: 指标派生
        let region_metrics =
            derivation.derive_dimension_metrics(&aggregation.by_region(&shipments, &sales));
        let province_metrics =
            derivation.derive_dimension_metrics(&aggregation.by_province(&shipments, &sales));
        let time_metrics =
            derivation.derive_dimension_metrics(&aggregation.by_month(&shipments, &sales));
        let salesperson_metrics =
            derivation.derive_dimension_metrics(&aggregation.by_applicant(&shipments, &sales));

        let mut customer_metrics =
            derivation.derive_customer_metrics(&aggregation.by_customer(&shipments, &sales));

        // C6: 分层与异常
        let segmentation = SegmentationEngine::new(self.params.clone());
        segmentation.apply(&mut customer_metrics);
        let segmentation_summary = segmentation.segment_summary(&customer_metrics);
        let potential_customers = segmentation.potential_customers(&customer_metrics);
        let high_low_efficiency_comparison =
            segmentation.efficiency_comparison(&customer_metrics);
        let anomaly_list =
            AnomalyEngine::new(self.params.clone()).detect(&customer_metrics, global_fee_ratio);

        // C7: 关联 / 回归 / 组合
        let groups = group_customer_months(&shipments, &sales);
        let correlation = CorrelationEngine::new();
        let material_product_association = correlation.associations(&groups);
        let regression_stats = correlation.regression(&groups);
        let material_combination_performance =
            CombinationEngine::new(self.params.clone()).analyze(&groups);

        debug!(
            scope_shipments = shipments.len(),
            scope_sales = sales.len(),
            customers = customer_metrics.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "视图投影完成"
        );

        ViewCatalogue {
            region_metrics,
            province_metrics,
            customer_metrics,
            time_metrics,
            salesperson_metrics,
            material_product_association,
            material_combination_performance,
            regression_stats,
            anomaly_list,
            segmentation_summary,
            potential_customers,
            high_low_efficiency_comparison,
            warnings: self.warnings,
            total_sales,
            total_material_cost,
            global_fee_ratio,
        }
    }
}
