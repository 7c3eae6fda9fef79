use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 文件读取错误 (I/O 错误, 权限不足, 非 UTF-8 内容)
    FileRead,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FileRead => "文件读取",
        }
    }
}

/// 错误记录器
///
/// 每个错误都打印到 stderr 并计数; 启用文件日志时同时写入错误日志文件。
/// 被记录的错误都已在本地恢复, 不会中断扫描
pub struct ErrorLogger {
    error_file: Mutex<Option<File>>,
    error_path: PathBuf,
    enabled: bool,
    error_counts: Mutex<HashMap<ErrorType, usize>>,
}

impl ErrorLogger {
    /// 创建新的错误记录器
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                error_file: Mutex::new(None),
                error_path: PathBuf::new(),
                enabled: false,
                error_counts: Mutex::new(HashMap::new()),
            });
        }

        // 获取当前时间作为文件名的一部分
        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");

        // 构建错误日志文件路径 - 与程序同级目录
        let error_path = PathBuf::from(format!("fuzzyfind_errors_{}.log", timestamp));

        // 创建错误日志文件
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# FuzzyFind 错误日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# ============================================")?;
        writeln!(file_clone)?;

        Ok(Self {
            error_file: Mutex::new(Some(file)),
            error_path,
            enabled: true,
            error_counts: Mutex::new(HashMap::new()),
        })
    }

    /// 记录一个已恢复的错误: 打印到 stderr 并计数
    pub fn report(&self, error_type: ErrorType, file_path: &Path, message: &str) -> Result<()> {
        eprintln!("读取文件失败 {}: {}", file_path.display(), message);

        // 更新错误计数
        {
            let mut counts = self.error_counts.lock().unwrap();
            *counts.entry(error_type).or_insert(0) += 1;
        }

        // 写入错误日志文件
        if self.enabled {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

            if let Ok(mut file_guard) = self.error_file.lock() {
                if let Some(ref mut file) = *file_guard {
                    writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;
                    writeln!(file, "  文件路径: {}", file_path.display())?;
                    writeln!(file)?;
                    file.flush()?;
                }
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> HashMap<ErrorType, usize> {
        self.error_counts.lock().unwrap().clone()
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        self.error_counts.lock().unwrap().values().sum()
    }

    /// 检查是否有错误
    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let now = Local::now();
                writeln!(file, "# ============================================")?;
                writeln!(file, "# 结束时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;

                let summary = self.get_error_summary();
                if summary.is_empty() {
                    writeln!(file, "# 无错误记录")?;
                } else {
                    writeln!(file, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(file, "#   总计: {} 个错误", self.get_total_errors())?;
                }

                file.flush()?;
            }
        }

        Ok(())
    }

    /// 打印错误摘要到控制台
    pub fn print_error_summary(&self) {
        if !self.has_errors() {
            return;
        }

        println!("\n扫描过程中发现错误:");
        println!("----------------------------");

        let summary = self.get_error_summary();
        for (error_type, count) in &summary {
            println!("  {}: {} 次", error_type.as_str(), count);
        }

        println!("  总计: {} 个错误", self.get_total_errors());
        if self.enabled {
            println!("  详细错误信息请查看: {}", self.error_path.display());
        }
    }
}
