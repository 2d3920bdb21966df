//! 命令行参数

use crate::config::Config;
use crate::services::Predicate;
use crate::workflow::IdScheme;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 题库 JSONL 记录检查与修正工具
#[derive(Parser, Debug)]
#[command(name = "question-audit", version, about)]
pub struct Cli {
    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML 配置文件
    #[arg(long, global = true, env = "QUESTION_AUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 统计并输出报告
    Report(ReportArgs),
    /// 删除指定记录并重新编号（原子覆写）
    Renumber(RenumberArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// JSONL 文件或包含 JSONL 文件的目录
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// 每道题应有的选项数
    #[arg(long)]
    pub expect_choices: Option<usize>,

    /// 疑问后缀（可多次指定，覆盖默认集合）
    #[arg(long = "suffix")]
    pub suffixes: Vec<String>,

    /// 列出不满足该判定的记录（可多次指定）
    #[arg(long, value_enum)]
    pub list_failing: Vec<Predicate>,

    /// 抽查的记录 ID（可多次指定）
    #[arg(long = "sample")]
    pub samples: Vec<String>,

    /// 结构违规写入的文件
    #[arg(long)]
    pub warn_file: Option<String>,

    /// 发现结构违规时以非零状态退出
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct RenumberArgs {
    /// 要修正的 JSONL 文件
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// 删除该 ID 的记录（可多次指定）
    #[arg(long = "drop-id")]
    pub drop_ids: Vec<String>,

    /// 删除题干包含该文本的记录（可多次指定）
    #[arg(long = "drop-containing")]
    pub drop_containing: Vec<String>,

    /// ID 前缀
    #[arg(long)]
    pub prefix: Option<String>,

    /// 序号补零宽度
    #[arg(long)]
    pub width: Option<usize>,

    /// 使用裸数字 ID
    #[arg(long, conflicts_with_all = ["prefix", "width"])]
    pub bare: bool,

    /// 只输出修正结果，不写回
    #[arg(long)]
    pub dry_run: bool,
}

impl ReportArgs {
    /// 命令行参数覆盖配置
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(n) = self.expect_choices {
            config.expected_choice_count = n;
        }
        if !self.suffixes.is_empty() {
            config.question_suffixes = self.suffixes.clone();
        }
        if let Some(path) = &self.warn_file {
            config.warn_file = Some(path.clone());
        }
    }
}

impl RenumberArgs {
    pub fn id_scheme(&self, config: &Config) -> IdScheme {
        if self.bare {
            return IdScheme::Bare;
        }
        IdScheme::prefixed(
            self.prefix.clone().unwrap_or_else(|| config.id_prefix.clone()),
            self.width.unwrap_or(config.id_width),
        )
    }
}
