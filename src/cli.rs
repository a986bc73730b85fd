use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 用 multeval 对多个机器翻译系统做显著性检验，并整理成按指标排序的结果表
#[derive(Debug, Parser)]
#[command(
    name = "multeval-runner",
    version,
    about = "Run multeval significance tests over MT system variants and tabulate the results"
)]
pub struct Cli {
    /// Test set suffix, e.g. test_2017_flickr
    #[arg(short, long)]
    pub test_set: String,

    /// Folder name of the baseline system
    #[arg(short, long)]
    pub baseline: String,

    /// Tokenized reference file
    #[arg(short, long = "ref", value_name = "FILE")]
    pub reference: PathBuf,

    /// Comma separated multeval metrics (first one is the primary metric)
    #[arg(short, long, alias = "multeval-metrics")]
    pub metrics: Option<String>,

    /// Metric used to sort systems (default: first metric)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Language code for language dependent metrics such as METEOR
    #[arg(short, long)]
    pub language: Option<String>,

    /// Suffix of hypothesis files
    #[arg(short, long)]
    pub suffix: Option<String>,

    /// Prefix of hypothesis files
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Metric name embedded in hypothesis file names (e.g. the checkpoint selection metric)
    #[arg(long)]
    pub metric: Option<String>,

    /// Exact hypothesis file name or glob, overrides prefix/metric/suffix
    #[arg(short, long)]
    pub custom_file: Option<String>,

    /// Output folder
    #[arg(short, long, value_name = "DIR")]
    pub output_folder: Option<PathBuf>,

    /// Force reevaluation even if the output folder exists
    #[arg(short, long)]
    pub force: bool,

    /// Approximate randomization shuffles
    #[arg(short, long)]
    pub ar_shuffles: Option<u32>,

    /// Path to the multeval executable
    #[arg(long, env = "MULTEVAL_BIN", value_name = "FILE")]
    pub multeval_bin: Option<PathBuf>,

    /// Configuration file (default: multeval_runner.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// System folders to evaluate besides the baseline (default: all subfolders)
    pub folders: Vec<String>,
}
