// ==========================================
// 营销物料投入产出分析系统 - 原始表模型
// ==========================================
// 职责: 承载外部解码器递交的自由列名表格
// 约定: 列顺序保留（价格列的第四列兜底依赖列序）
// ==========================================

use std::collections::HashMap;

/// 原始表格: 有序列名 + 按列名取值的行
///
/// 表格来自外部的电子表格解码协作方（不在本核心范围内）,
/// 单元格一律以字符串形式递交,类型强制转换由规范化层负责。
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// 追加一行; 值按列序对应,多余的值被忽略,缺少的列记空串
    pub fn push_row<S: Into<String>>(&mut self, values: Vec<S>) {
        let mut row = HashMap::with_capacity(self.columns.len());
        let mut it = values.into_iter();
        for col in &self.columns {
            let value = it.next().map(Into::into).unwrap_or_default();
            row.insert(col.clone(), value);
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 是否存在指定列名
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// 按位置取列名（价格列第四列兜底用）
    pub fn column_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }
}
