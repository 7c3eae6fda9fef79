use std::time::Instant;

use anyhow::Result;

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 搜索摘要
pub struct SearchSummary {
    pub start_time: Instant,
    pub total_files: u64,
    pub matched_files: u64,
    pub total_matches: u64,
    pub read_errors: u64,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_files: 0,
            matched_files: 0,
            total_matches: 0,
            read_errors: 0,
        }
    }

    pub fn print(&self) -> Result<()> {
        let duration = self.start_time.elapsed();

        println!("\n搜索摘要:");
        println!("----------------------------");
        println!("总用时: {}", format_duration(duration));
        println!("扫描文件: {}", self.total_files);
        println!("匹配文件: {}", self.matched_files);
        println!("匹配项数: {}", self.total_matches);
        if self.read_errors > 0 {
            println!("读取失败: {}", self.read_errors);
        }

        Ok(())
    }
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self::new()
    }
}
