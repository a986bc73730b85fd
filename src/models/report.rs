use crate::error::RunnerError;

/// 评测报告中的一行：系统标签加上各指标的分数字段
///
/// 分数字段形如 `27.4 (0.3/0.2/0.01)`，与表头中的指标列一一对应。
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: String,
    pub scores: Vec<String>,
}

impl MetricRow {
    /// 行的全部字段（标签在前）
    pub fn fields(&self) -> Vec<&str> {
        std::iter::once(self.label.as_str())
            .chain(self.scores.iter().map(String::as_str))
            .collect()
    }

    pub fn field_count(&self) -> usize {
        self.scores.len() + 1
    }

    /// 取第 `column` 列（0 为标签列）分数字段的首个数值
    pub fn primary_score(&self, column: usize) -> Result<f64, RunnerError> {
        let field = column
            .checked_sub(1)
            .and_then(|i| self.scores.get(i))
            .ok_or_else(|| RunnerError::MalformedOutput(format!(
                "row '{}' has no column {}",
                self.label, column
            )))?;

        field
            .split_whitespace()
            .next()
            .and_then(|value| value.parse::<f64>().ok())
            .ok_or_else(|| RunnerError::InvalidScore {
                system: self.label.clone(),
                value: field.clone(),
            })
    }

    /// 只保留标签中最后一个冒号之后的部分
    pub fn shorten_label(&mut self) {
        let short = self.label.rsplit(':').next().unwrap_or_default().trim().to_string();
        self.label = short;
    }
}

/// 整理后的报告表：表头、基线行以及排序后的其余系统行
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub baseline: MetricRow,
    pub systems: Vec<MetricRow>,
}

impl ReportTable {
    /// 按指标名查找表头列，大小写不敏感
    pub fn column_index(&self, metric: &str) -> Result<usize, RunnerError> {
        let wanted = metric.to_uppercase();
        self.header
            .iter()
            .skip(1)
            .position(|h| *h == wanted)
            .map(|i| i + 1)
            .ok_or_else(|| RunnerError::UnknownMetric {
                metric: wanted,
                header: self.header.clone(),
            })
    }

    /// 基线在前的全部行
    pub fn rows(&self) -> impl Iterator<Item = &MetricRow> {
        std::iter::once(&self.baseline).chain(self.systems.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, scores: &[&str]) -> MetricRow {
        MetricRow {
            label: label.to_string(),
            scores: scores.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_primary_score() {
        let r = row("sysA", &["26.7 (0.3/0.1/0.01)", "30.5 (0.2/0.1/0.20)"]);
        assert_eq!(r.primary_score(1).unwrap(), 26.7);
        assert_eq!(r.primary_score(2).unwrap(), 30.5);
        assert!(matches!(r.primary_score(0), Err(RunnerError::MalformedOutput(_))));
        assert!(matches!(r.primary_score(3), Err(RunnerError::MalformedOutput(_))));
    }

    #[test]
    fn test_primary_score_not_numeric() {
        let r = row("sysA", &["n/a (0.3)"]);
        match r.primary_score(1) {
            Err(RunnerError::InvalidScore { system, value }) => {
                assert_eq!(system, "sysA");
                assert_eq!(value, "n/a (0.3)");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_shorten_label() {
        let mut r = row("exp:group: systemA ", &[]);
        r.shorten_label();
        assert_eq!(r.label, "systemA");

        let mut plain = row("  plain ", &[]);
        plain.shorten_label();
        assert_eq!(plain.label, "plain");

        let mut trailing = row("exp:", &[]);
        trailing.shorten_label();
        assert_eq!(trailing.label, "");
    }

    #[test]
    fn test_column_index_is_case_insensitive() {
        let table = ReportTable {
            header: vec!["System".to_string(), "BLEU".to_string(), "METEOR".to_string()],
            baseline: row("base", &["1.0 (0)", "2.0 (0)"]),
            systems: vec![],
        };

        assert_eq!(table.column_index("bleu").unwrap(), 1);
        assert_eq!(table.column_index("Meteor").unwrap(), 2);
        assert!(matches!(table.column_index("ter"), Err(RunnerError::UnknownMetric { .. })));
        // 标签列不参与匹配
        assert!(table.column_index("system").is_err());
    }

    #[test]
    fn test_rows_baseline_first() {
        let table = ReportTable {
            header: vec!["System".to_string(), "BLEU".to_string()],
            baseline: row("base", &["1.0 (0)"]),
            systems: vec![row("a", &["2.0 (0)"]), row("b", &["3.0 (0)"])],
        };
        let labels: Vec<_> = table.rows().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["base", "a", "b"]);
        assert_eq!(table.baseline.fields(), vec!["base", "1.0 (0)"]);
        assert_eq!(table.baseline.field_count(), 2);
    }
}
