use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use FuzzyFind::application::{run_scan, Config};
use FuzzyFind::domain::{SearchPart, SearchRequest};
use FuzzyFind::infrastructure::{ErrorLogger, Logger, LoggerTrait};
use FuzzyFind::presentation::SearchSummary;

/// 按模糊关键词匹配筛选文件的命令行工具
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 要搜索的目录路径
    #[clap(default_value = ".")]
    directory: PathBuf,

    /// 文件名后缀过滤 (例如 ".txt")
    #[clap(short, long)]
    ending: String,

    /// 逗号分隔的关键词列表
    #[clap(short, long)]
    keywords: String,

    /// 结果输出文件路径 (已存在时覆盖)
    #[clap(short, long)]
    output: PathBuf,

    /// 搜索区域 (beginning/middle/end/all, 其他输入按 all 处理)
    #[clap(short, long)]
    part: Option<String>,

    /// 模糊匹配阈值 (0-100)
    #[clap(short, long)]
    threshold: Option<u8>,

    /// 启用详细日志记录, 日志文件将保存到程序同级目录下
    #[clap(long)]
    log: bool,

    /// 遵循 .gitignore 规则, 默认情况下会搜索所有文件
    #[clap(long)]
    respect_gitignore: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置文件, 命令行参数优先于配置默认值
    let config = Config::load_or_create(&Config::default_config_path()?)?;
    config.validate()?;

    // 初始化日志记录器
    let logger = Logger::new(args.log)?;
    let errors = ErrorLogger::new(args.log)?;

    let threshold = args.threshold.unwrap_or(config.search.default_threshold);
    let part_input = args
        .part
        .unwrap_or_else(|| config.search.default_search_part.clone());
    let search_part = SearchPart::parse(&part_input);
    let keywords = SearchRequest::parse_keywords(&args.keywords);
    let respect_gitignore = args.respect_gitignore || config.search.respect_gitignore;

    // 参数在构造时校验, 非法输入直接报错退出
    let request = SearchRequest::new(
        args.directory,
        args.ending,
        keywords,
        args.output,
        search_part,
        threshold,
    )?;

    // 开始搜索
    println!(
        "在 {} 中搜索关键词: {}",
        request.directory.display(),
        request.keywords.join(", ")
    );
    println!("文件后缀: {}", request.file_ending);
    println!("搜索区域: {}", request.search_part);
    println!("匹配阈值: {}", request.threshold);
    println!("输出文件: {}", request.output.display());
    println!("遵循 .gitignore 规则: {}", respect_gitignore);
    println!();

    // 记录搜索参数到日志
    if logger.is_enabled() {
        logger.log_message(&format!("目标目录: {}", request.directory.display()))?;
        logger.log_message(&format!("文件后缀: {}", request.file_ending))?;
        logger.log_message(&format!("关键词: {}", request.keywords.join(", ")))?;
        logger.log_message(&format!("搜索区域: {}", request.search_part))?;
        logger.log_message(&format!("匹配阈值: {}", request.threshold))?;
    }

    let mut summary = SearchSummary::new();

    // 执行扫描
    let outcome = run_scan(&request, respect_gitignore, &logger, &errors)?;

    summary.total_files = outcome.total_files;
    summary.matched_files = outcome.matched_files;
    summary.total_matches = outcome.total_matches;
    summary.read_errors = outcome.read_errors;

    // 打印摘要
    summary.print()?;
    println!("搜索完成, 结果已写入: {}", request.output.display());

    // 完成日志记录
    logger.finalize(
        outcome.total_files,
        outcome.matched_files,
        outcome.total_matches,
        summary.start_time.elapsed(),
    )?;
    errors.finalize()?;
    errors.print_error_summary();

    Ok(())
}
