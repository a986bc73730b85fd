// models.rs - 作为模块目录入口文件（Rust 2018+ 风格）
// 导出所有子模块
pub mod config;
pub mod report;
pub mod system;

// 重新导出常用类型
pub use config::{Config, DefaultsConfig, EvaluatorConfig, RunSettings};
pub use report::{MetricRow, ReportTable};
pub use system::{Discovery, OrderedSystemTable, SkippedSystem, SystemGroup};
